//! Report directory read/write operations
//!
//! A report directory holds a JSON data file describing the suite tree plus
//! the static assets and screenshots the data refers to.

use crate::Result;
use crate::models::ReportData;
use crate::services::relocate::move_file;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

/// Read a report's data file.
///
/// A report without a data file is treated as empty; a data file that cannot
/// be parsed is an error.
pub fn load_report_data(report_dir: &Path, data_file: &str) -> Result<ReportData> {
    let path = report_dir.join(data_file);

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            log::warn!(
                "Not found data file in passed source report path: {}",
                report_dir.display()
            );
            return Ok(ReportData::default());
        }
        Err(err) => return Err(err.into()),
    };

    let data = serde_json::from_reader(BufReader::new(file))?;
    Ok(data)
}

/// Write a report's data file, creating the report directory if needed.
pub fn save_report_data(report_dir: &Path, data_file: &str, data: &ReportData) -> Result<()> {
    fs::create_dir_all(report_dir)?;

    let file = File::create(report_dir.join(data_file))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Move everything except the data file from one report directory into another.
///
/// Existing entries in the destination are replaced.
pub fn move_report_content(from: &Path, to: &Path, data_file: &str) -> Result<usize> {
    fs::create_dir_all(to)?;

    let mut moved = 0;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let name = entry.file_name();
        if name == data_file {
            continue;
        }

        let destination = to.join(&name);
        log::debug!(
            "Moving {} -> {}",
            entry.path().display(),
            destination.display()
        );
        move_file(&entry.path(), &destination)?;
        moved += 1;
    }

    Ok(moved)
}
