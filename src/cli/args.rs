//! CLI argument parsing

use crate::DEFAULT_DATA_FILE;

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub command: Command,
}

#[derive(Debug, Clone)]
pub enum Command {
    Merge(MergeArgs),
    Stats(StatsArgs),
}

#[derive(Debug, Clone)]
pub struct MergeArgs {
    pub sources: Vec<String>,
    pub destination: Option<String>,
    pub data_file: String,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct StatsArgs {
    pub report: String,
    pub data_file: String,
    pub browser: Option<String>,
    pub json: bool,
}

impl Default for MergeArgs {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            destination: None,
            data_file: DEFAULT_DATA_FILE.to_string(),
            json: false,
            quiet: false,
        }
    }
}

/// Parse command line arguments
pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    if args.len() < 2 {
        return Err("No command specified".to_string());
    }

    let command = match args[1].as_str() {
        "merge" => Command::Merge(parse_merge_args(&args[2..])?),
        "stats" => Command::Stats(parse_stats_args(&args[2..])?),
        _ => return Err(format!("Unknown command: {}", args[1])),
    };

    Ok(CliArgs { command })
}

fn take_value<'a>(
    args: &'a [String],
    i: &mut usize,
    flag: &str,
    what: &str,
) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires {what}"))
}

fn parse_merge_args(args: &[String]) -> Result<MergeArgs, String> {
    let mut merge_args = MergeArgs::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--destination" | "-d" => {
                let value = take_value(args, &mut i, "--destination", "a directory path")?;
                merge_args.destination = Some(value.to_string());
            }
            "--data-file" => {
                let value = take_value(args, &mut i, "--data-file", "a file name")?;
                merge_args.data_file = value.to_string();
            }
            "--json" => {
                merge_args.json = true;
            }
            "--quiet" => {
                merge_args.quiet = true;
            }
            arg if !arg.starts_with('-') => {
                merge_args.sources.push(arg.to_string());
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    if merge_args.sources.is_empty() {
        return Err("Missing required argument: SOURCE_REPORT".to_string());
    }

    if merge_args.destination.is_none() {
        return Err("Missing required option: --destination".to_string());
    }

    Ok(merge_args)
}

fn parse_stats_args(args: &[String]) -> Result<StatsArgs, String> {
    let mut report = String::new();
    let mut data_file = DEFAULT_DATA_FILE.to_string();
    let mut browser = None;
    let mut json = false;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--data-file" => {
                data_file = take_value(args, &mut i, "--data-file", "a file name")?.to_string();
            }
            "--browser" => {
                browser = Some(take_value(args, &mut i, "--browser", "a browser id")?.to_string());
            }
            "--json" => {
                json = true;
            }
            arg if !arg.starts_with('-') => {
                if report.is_empty() {
                    report = arg.to_string();
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    if report.is_empty() {
        return Err("Missing required argument: REPORT_DIR".to_string());
    }

    Ok(StatsArgs {
        report,
        data_file,
        browser,
        json,
    })
}
