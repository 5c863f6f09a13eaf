//! Output formatting for CLI

use crate::MergeSummary;
use crate::models::{ErrorItem, StatCounters};

const MAX_LISTED_ERRORS: usize = 5;

/// Print a merge summary as human-readable text
pub fn format_text(summary: &MergeSummary, destination: &str) {
    let data = &summary.data;

    println!("Merged report: {destination}");
    println!();
    print_counters("all browsers", &data.stats);
    for (browser, counters) in &data.per_browser {
        print_counters(browser, counters);
    }
    println!();
    println!("Skipped tests recorded: {}", data.skips.len());
    println!("Artifacts moved: {}", summary.moved_artifacts);

    print_errors(&summary.errors);
}

/// Print one counter row per scope
pub fn print_counters(scope: &str, counters: &StatCounters) {
    println!(
        "{scope:<24} total {:>6}  passed {:>6}  failed {:>6}  skipped {:>6}  retries {:>6}",
        counters.total, counters.passed, counters.failed, counters.skipped, counters.retries
    );
}

fn print_errors(errors: &[ErrorItem]) {
    if errors.is_empty() {
        return;
    }

    println!();
    println!("Artifacts not moved: {}", errors.len());
    for error in errors.iter().take(MAX_LISTED_ERRORS) {
        eprintln!("  {} ({}): {}", error.path, error.code, error.message);
    }
    if errors.len() > MAX_LISTED_ERRORS {
        eprintln!("  ... and {} more", errors.len() - MAX_LISTED_ERRORS);
    }
}

/// Format a merge summary as JSON
#[must_use]
pub fn format_json(summary: &MergeSummary, destination: &str) -> String {
    let data = &summary.data;
    let output = serde_json::json!({
        "destination": destination,
        "stats": data.stats,
        "perBrowser": data.per_browser,
        "skips": data.skips.len(),
        "moved_artifacts": summary.moved_artifacts,
        "error_count": summary.errors.len(),
        "errors": if summary.errors.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::json!(summary.errors)
        }
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

/// Format counters of a single scope as JSON
#[must_use]
pub fn format_counters_json(scope: &str, counters: &StatCounters) -> String {
    let output = serde_json::json!({
        "scope": scope,
        "stats": counters,
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}
