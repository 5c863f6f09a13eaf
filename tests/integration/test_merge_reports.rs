//! Integration test for merging report directories end to end

use crate::fixtures::{
    browser, browser_of, report, result, result_with_image, suite_tree, suite_tree_at,
    write_file_sync, write_report_dir,
};
use report_merge::io::report::load_report_data;
use report_merge::models::{ReportData, Status};
use report_merge::{MergeOptions, merge_reports};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_merges_two_shards_into_destination() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_report_dir(
        temp_dir.path(),
        "shard-1",
        &report(vec![suite_tree(vec![browser(
            "yabro",
            result_with_image(Status::FAIL, 0, "images/yabro~current_0.png"),
            vec![],
        )])]),
        &["images/yabro~current_0.png"],
    );
    let second = write_report_dir(
        temp_dir.path(),
        "shard-2",
        &report(vec![suite_tree(vec![browser(
            "yabro",
            result_with_image(Status::SUCCESS, 0, "images/yabro~current_0.png"),
            vec![],
        )])]),
        &["images/yabro~current_0.png"],
    );
    let dest = temp_dir.path().join("merged");

    let summary = merge_reports(&[&first, &second], &MergeOptions::new(&dest)).unwrap();

    assert_eq!(
        fs::read_to_string(dest.join("images/yabro~current_0.png")).unwrap(),
        "shard-1:images/yabro~current_0.png"
    );
    assert_eq!(
        fs::read_to_string(dest.join("images/yabro~current_1.png")).unwrap(),
        "shard-2:images/yabro~current_0.png"
    );
    assert!(summary.errors.is_empty());
    assert_eq!(summary.moved_artifacts, 1);

    let merged = browser_of(&summary.data, "yabro");
    assert_eq!(merged.result.status, Status::SUCCESS);
    assert_eq!(merged.result.attempt, 1);
    assert_eq!(merged.retries.len(), 1);
    assert_eq!(summary.data.stats.passed, 1);
    assert_eq!(summary.data.stats.retries, 1);

    let saved = load_report_data(&dest, "data.json").unwrap();
    assert_eq!(saved, summary.data);
}

#[test]
fn test_first_report_content_is_moved_not_copied() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_report_dir(
        temp_dir.path(),
        "shard-1",
        &report(vec![]),
        &["index.html", "static/app.js"],
    );
    let second = write_report_dir(temp_dir.path(), "shard-2", &report(vec![]), &[]);
    let dest = temp_dir.path().join("merged");

    merge_reports(&[first.clone(), second], &MergeOptions::new(&dest)).unwrap();

    assert!(dest.join("index.html").exists());
    assert!(dest.join("static/app.js").exists());
    assert!(!first.join("index.html").exists());
    assert!(!first.join("static").exists());
    // the first report's data file stays behind; the destination gets a fresh one
    assert!(first.join("data.json").exists());
    assert!(dest.join("data.json").exists());
}

#[test]
fn test_single_source_is_copied_through() {
    let temp_dir = TempDir::new().unwrap();
    let data = report(vec![suite_tree_at(
        "suite",
        "state",
        vec![browser("yabro", result(Status::SKIPPED, 0), vec![])],
    )]);
    let only = write_report_dir(temp_dir.path(), "only", &data, &[]);
    let dest = temp_dir.path().join("merged");

    let summary = merge_reports(&[only], &MergeOptions::new(&dest)).unwrap();

    assert_eq!(summary.data, data);
    assert_eq!(load_report_data(&dest, "data.json").unwrap(), data);
}

#[test]
fn test_source_without_data_file_is_treated_as_empty() {
    let temp_dir = TempDir::new().unwrap();
    let data = report(vec![suite_tree(vec![browser(
        "yabro",
        result(Status::SUCCESS, 0),
        vec![],
    )])]);
    let first = write_report_dir(temp_dir.path(), "shard-1", &data, &[]);
    let empty = temp_dir.path().join("empty");
    fs::create_dir_all(&empty).unwrap();
    let dest = temp_dir.path().join("merged");

    let summary = merge_reports(&[first, empty], &MergeOptions::new(&dest)).unwrap();

    assert_eq!(summary.data, data);
}

#[test]
fn test_corrupt_data_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_report_dir(temp_dir.path(), "shard-1", &report(vec![]), &["index.html"]);
    let broken = temp_dir.path().join("broken");
    write_file_sync(broken.join("data.json"), b"{ not json").unwrap();
    let dest = temp_dir.path().join("merged");

    let result = merge_reports(&[first.clone(), broken], &MergeOptions::new(&dest));

    assert!(matches!(result, Err(report_merge::Error::Json(_))));
    // nothing is moved when a source cannot be read
    assert!(first.join("index.html").exists());
    assert!(!dest.exists());
}

#[test]
fn test_missing_artifact_still_writes_data_file() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_report_dir(
        temp_dir.path(),
        "shard-1",
        &report(vec![suite_tree(vec![browser(
            "yabro",
            result(Status::SUCCESS, 0),
            vec![],
        )])]),
        &[],
    );
    let second = write_report_dir(
        temp_dir.path(),
        "shard-2",
        &report(vec![suite_tree(vec![browser(
            "yabro",
            result_with_image(Status::FAIL, 0, "images/yabro~current_0.png"),
            vec![],
        )])]),
        &[],
    );
    let dest = temp_dir.path().join("merged");

    let summary = merge_reports(&[first, second], &MergeOptions::new(&dest)).unwrap();

    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].code, "ENOENT");
    let saved = load_report_data(&dest, "data.json").unwrap();
    assert_eq!(browser_of(&saved, "yabro").result.status, Status::FAIL);
}

#[test]
fn test_custom_data_file_name() {
    let temp_dir = TempDir::new().unwrap();
    let data = report(vec![suite_tree(vec![browser(
        "yabro",
        result(Status::SUCCESS, 0),
        vec![],
    )])]);
    let src = temp_dir.path().join("shard");
    write_file_sync(
        src.join("report.json"),
        serde_json::to_string(&data).unwrap().as_bytes(),
    )
    .unwrap();
    let dest = temp_dir.path().join("merged");

    let mut opts = MergeOptions::new(&dest);
    opts.data_file = "report.json".to_string();
    merge_reports(&[src], &opts).unwrap();

    assert_eq!(load_report_data(&dest, "report.json").unwrap(), data);
    assert!(!dest.join("data.json").exists());
    assert_eq!(
        load_report_data(&dest, "data.json").unwrap(),
        ReportData::default()
    );
}
