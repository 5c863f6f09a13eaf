//! Attempt history linearization for a browser present on both sides of a merge

use crate::models::BrowserEntry;

/// Append the source history after the target history and renumber it.
///
/// The combined history is `target.retries ++ [target.result] ++
/// source.retries ++ [source.result]`; attempts are renumbered `0..N` in that
/// order and the source's result becomes the current result. Nothing is
/// deduplicated across the two sides.
pub fn linearize(target: &mut BrowserEntry, source: BrowserEntry) {
    let BrowserEntry {
        result: source_result,
        retries: source_retries,
        ..
    } = source;

    let previous = std::mem::replace(&mut target.result, source_result);
    target.retries.reserve(source_retries.len() + 1);
    target.retries.push(previous);
    target.retries.extend(source_retries);

    for (attempt, retry) in (0u32..).zip(target.retries.iter_mut()) {
        retry.attempt = attempt;
    }
    target.result.attempt = u32::try_from(target.retries.len()).unwrap_or(u32::MAX);
}
