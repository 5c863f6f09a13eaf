//! Data models for report trees, attempts, artifacts, skips and counters

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Final outcome of a single test attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Error,
    Fail,
    /// Reference image was accepted as the new baseline.
    Updated,
    Success,
    Skipped,
}

/// Placeholder states a node may carry before any result exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingState {
    Running,
    Queued,
    Idle,
}

/// Status of a suite, state or attempt.
///
/// Only `Terminal` statuses ever move the passed/failed/skipped counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Status {
    Terminal(Outcome),
    Pending(PendingState),
}

impl Status {
    pub const ERROR: Status = Status::Terminal(Outcome::Error);
    pub const FAIL: Status = Status::Terminal(Outcome::Fail);
    pub const UPDATED: Status = Status::Terminal(Outcome::Updated);
    pub const SUCCESS: Status = Status::Terminal(Outcome::Success);
    pub const SKIPPED: Status = Status::Terminal(Outcome::Skipped);
    pub const RUNNING: Status = Status::Pending(PendingState::Running);
    pub const QUEUED: Status = Status::Pending(PendingState::Queued);
    pub const IDLE: Status = Status::Pending(PendingState::Idle);

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Terminal(Outcome::Error) => "error",
            Status::Terminal(Outcome::Fail) => "fail",
            Status::Terminal(Outcome::Updated) => "updated",
            Status::Terminal(Outcome::Success) => "success",
            Status::Terminal(Outcome::Skipped) => "skipped",
            Status::Pending(PendingState::Running) => "running",
            Status::Pending(PendingState::Queued) => "queued",
            Status::Pending(PendingState::Idle) => "idle",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "error" => Some(Status::ERROR),
            "fail" => Some(Status::FAIL),
            "updated" => Some(Status::UPDATED),
            "success" => Some(Status::SUCCESS),
            "skipped" => Some(Status::SKIPPED),
            "running" => Some(Status::RUNNING),
            "queued" => Some(Status::QUEUED),
            "idle" => Some(Status::IDLE),
            _ => None,
        }
    }

    /// Counter that a browser whose current result has this status contributes to.
    #[must_use]
    pub fn stat_kind(&self) -> Option<StatKind> {
        match self {
            Status::Terminal(Outcome::Success | Outcome::Updated) => Some(StatKind::Passed),
            Status::Terminal(Outcome::Fail | Outcome::Error) => Some(StatKind::Failed),
            Status::Terminal(Outcome::Skipped) => Some(StatKind::Skipped),
            Status::Pending(_) => None,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::from_label(s).ok_or_else(|| format!("unknown status '{s}'"))
    }
}

impl TryFrom<String> for Status {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

/// Counter names maintained for the whole report and per browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    Total,
    Passed,
    Failed,
    Skipped,
    Retries,
}

/// Aggregate counters `{total, passed, failed, skipped, retries}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatCounters {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub retries: u64,
}

impl StatCounters {
    pub fn get_mut(&mut self, kind: StatKind) -> &mut u64 {
        match kind {
            StatKind::Total => &mut self.total,
            StatKind::Passed => &mut self.passed,
            StatKind::Failed => &mut self.failed,
            StatKind::Skipped => &mut self.skipped,
            StatKind::Retries => &mut self.retries,
        }
    }
}

/// A whole report as stored in its data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    #[serde(default)]
    pub skips: Vec<SkipInfo>,
    #[serde(default)]
    pub suites: Vec<SuiteNode>,
    #[serde(flatten)]
    pub stats: StatCounters,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub per_browser: BTreeMap<String, StatCounters>,
    /// Report-level fields the merge does not interpret (`config`, `date`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A suite or state in the test hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteNode {
    pub name: String,
    pub suite_path: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SuiteNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browsers: Option<Vec<BrowserEntry>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SuiteNode {
    /// Create a node with no browsers and no children.
    #[must_use]
    pub fn new(suite_path: &[&str]) -> Self {
        Self {
            name: suite_path.last().copied().unwrap_or_default().to_string(),
            suite_path: suite_path.iter().map(|s| (*s).to_string()).collect(),
            status: None,
            children: None,
            browsers: None,
            extra: Map::new(),
        }
    }
}

/// One browser's attempt history for a state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserEntry {
    pub name: String,
    pub result: TestResult,
    #[serde(default)]
    pub retries: Vec<TestResult>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BrowserEntry {
    /// Attempts oldest first, current result last.
    pub fn attempts(&self) -> impl Iterator<Item = &TestResult> {
        self.retries.iter().chain(std::iter::once(&self.result))
    }

    /// Number of attempts recorded, current result included.
    #[must_use]
    pub fn attempt_count(&self) -> usize {
        self.retries.len() + 1
    }
}

/// One execution outcome of a browser entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub status: Status,
    #[serde(default)]
    pub attempt: u32,
    #[serde(default)]
    pub images_info: Vec<ImageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_info: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TestResult {
    #[must_use]
    pub fn new(status: Status, attempt: u32) -> Self {
        Self {
            status,
            attempt,
            images_info: Vec::new(),
            meta_info: None,
            error: None,
            extra: Map::new(),
        }
    }
}

/// Screenshot artifacts produced for one assertion of an attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_img: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_img: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_img: Option<ImageRef>,
    /// Externally owned baseline; never relocated. Read from `refImg` or
    /// `refImage`, always written back as `refImg`.
    #[serde(default, alias = "refImage", skip_serializing_if = "Option::is_none")]
    pub ref_img: Option<ImageRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageInfo {
    /// Images owned by the report itself (actual, expected, diff).
    pub fn relocatable_mut(&mut self) -> impl Iterator<Item = &mut ImageRef> {
        [
            self.actual_img.as_mut(),
            self.expected_img.as_mut(),
            self.diff_img.as_mut(),
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ImageSize>,
}

impl ImageRef {
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            size: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// "This test was skipped in this browser" record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkipInfo {
    pub suite: String,
    pub browser: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Represents a non-fatal error encountered while moving report files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorItem {
    pub path: String,
    pub code: String,
    pub message: String,
}
