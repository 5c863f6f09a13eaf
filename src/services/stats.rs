//! Incrementally maintained report counters

use crate::models::{BrowserEntry, StatCounters, StatKind, Status, SuiteNode};
use std::collections::BTreeMap;

/// Global counters mirrored per browser name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub totals: StatCounters,
    pub per_browser: BTreeMap<String, StatCounters>,
}

impl Stats {
    #[must_use]
    pub fn new(totals: StatCounters, per_browser: BTreeMap<String, StatCounters>) -> Self {
        Self {
            totals,
            per_browser,
        }
    }

    /// Account for a browser entry that was not in the aggregate before.
    pub fn record_new(&mut self, browser: &BrowserEntry) {
        let name = browser.name.as_str();
        if let Some(kind) = browser.result.status.stat_kind() {
            self.change(name, StatKind::Total, 1);
            self.change(name, kind, 1);
        }
        if !browser.retries.is_empty() {
            self.change(name, StatKind::Retries, count(browser.retries.len()));
        }
    }

    /// Account for a browser entry whose history grew from `old_retries` to
    /// `new_retries` prior attempts and whose current status changed.
    ///
    /// `total` is untouched: it is still the same logical test.
    pub fn record_update(
        &mut self,
        browser: &str,
        old_status: Status,
        new_status: Status,
        old_retries: usize,
        new_retries: usize,
    ) {
        if let Some(kind) = old_status.stat_kind() {
            self.change(browser, kind, -1);
        }
        if let Some(kind) = new_status.stat_kind() {
            self.change(browser, kind, 1);
        }
        if new_retries > old_retries {
            self.change(browser, StatKind::Retries, count(new_retries - old_retries));
        }
    }

    fn change(&mut self, browser: &str, kind: StatKind, delta: i64) {
        apply(&mut self.totals, kind, delta, "all browsers");
        let per_browser = self.per_browser.entry(browser.to_string()).or_default();
        apply(per_browser, kind, delta, browser);
    }

    /// Recompute every counter by walking nested suites.
    #[must_use]
    pub fn from_suites(suites: &[SuiteNode]) -> Self {
        let mut stats = Self::default();
        let mut stack: Vec<&SuiteNode> = suites.iter().collect();
        while let Some(node) = stack.pop() {
            for browser in node.browsers.iter().flatten() {
                stats.record_new(browser);
            }
            stack.extend(node.children.iter().flatten());
        }
        stats
    }
}

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn apply(counters: &mut StatCounters, kind: StatKind, delta: i64, scope: &str) {
    let slot = counters.get_mut(kind);
    let magnitude = delta.unsigned_abs();
    if delta >= 0 {
        *slot = slot.saturating_add(magnitude);
    } else if *slot < magnitude {
        log::warn!("Counter {kind:?} for {scope} would drop below zero; clamping");
        *slot = 0;
    } else {
        *slot -= magnitude;
    }
}
