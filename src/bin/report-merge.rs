//! Report merge CLI (report-merge) - Main binary entry point

use report_merge::cli::args::{Command, MergeArgs, StatsArgs, parse_args};
use report_merge::cli::output::{format_counters_json, format_json, format_text, print_counters};
use report_merge::services::stats::Stats;
use report_merge::{Error, MergeOptions};
use std::path::Path;
use std::process;

fn main() {
    // Initialize logger (controlled by RUST_LOG environment variable)
    // Example: RUST_LOG=debug report-merge merge shard-1 shard-2 -d merged
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "--help" | "-h" => {
            print_help();
            return;
        }
        "--version" | "-v" => {
            print_version();
            return;
        }
        _ => {}
    }

    let cli_args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(2);
        }
    };

    let exit_code = match &cli_args.command {
        Command::Merge(merge_args) => handle_merge(merge_args),
        Command::Stats(stats_args) => handle_stats(stats_args),
    };

    process::exit(exit_code);
}

fn exit_code_for(err: &Error) -> i32 {
    match err {
        Error::InvalidInput(_) | Error::MalformedTree(_) | Error::Json(_) => 2,
        Error::Io(_) => 4,
    }
}

fn handle_merge(args: &MergeArgs) -> i32 {
    let Some(destination) = args.destination.as_deref() else {
        eprintln!("Error: --destination is required for merge command");
        return 2;
    };

    let opts = MergeOptions {
        data_file: args.data_file.clone(),
        ..MergeOptions::new(destination)
    };

    if !args.quiet && !args.json {
        eprintln!(
            "Merging {} report(s) into {destination}",
            args.sources.len()
        );
    }

    let summary = match report_merge::merge_reports(&args.sources, &opts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    if args.json {
        println!("{}", format_json(&summary, destination));
    } else if !args.quiet {
        format_text(&summary, destination);
    }

    if summary.errors.is_empty() {
        0
    } else {
        3 // Merged, but some artifacts were not moved
    }
}

fn handle_stats(args: &StatsArgs) -> i32 {
    let report_dir = Path::new(&args.report);
    let data = match report_merge::io::report::load_report_data(report_dir, &args.data_file) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error reading report: {e}");
            return exit_code_for(&e);
        }
    };

    let recomputed = Stats::from_suites(&data.suites);
    if recomputed.totals != data.stats {
        log::warn!(
            "Stored counters {:?} differ from the suite tree {:?}",
            data.stats,
            recomputed.totals
        );
    }

    let (scope, counters) = match args.browser.as_deref() {
        Some(browser) => match recomputed.per_browser.get(browser) {
            Some(counters) => (browser, *counters),
            None => {
                eprintln!("Error: Browser '{browser}' not found in report");
                return 2;
            }
        },
        None => ("all browsers", recomputed.totals),
    };

    if args.json {
        println!("{}", format_counters_json(scope, &counters));
    } else {
        print_counters(scope, &counters);
    }

    0
}

fn print_help() {
    println!("Report merge CLI (report-merge) - Combine sharded test reports into one");
    println!();
    println!("USAGE:");
    println!("    report-merge merge <SOURCE_REPORT>... --destination <DIR> [OPTIONS]");
    println!("    report-merge stats <REPORT_DIR> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    merge     Merge report directories, moving screenshots into the destination");
    println!("    stats     Recount results of a report directory from its suite tree");
    println!();
    println!("GLOBAL OPTIONS:");
    println!("    -h, --help                 Show this help message");
    println!("    -v, --version              Show version information");
    println!();
    println!("MERGE OPTIONS:");
    println!("    -d, --destination <DIR>   Directory of the merged report (required)");
    println!("    --data-file <NAME>        Data file inside each report (default: data.json)");
    println!("    --json                    Emit machine-readable output");
    println!("    --quiet                   Suppress non-error output");
    println!();
    println!("STATS OPTIONS:");
    println!("    --data-file <NAME>        Data file inside the report (default: data.json)");
    println!("    --browser <ID>            Only show counters for one browser");
    println!("    --json                    Emit machine-readable output");
    println!();
    println!("EXAMPLES:");
    println!("    report-merge merge shard-1 shard-2 shard-3 --destination merged-report");
    println!("    report-merge stats merged-report --browser chrome --json");
}

fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_DATE: &str = env!("GIT_DATE");
    const BUILD_TARGET: &str = env!("BUILD_TARGET");

    println!("report-merge {VERSION}");
    println!("Commit: {GIT_HASH} ({GIT_DATE})");
    println!("Target: {BUILD_TARGET}");
}
