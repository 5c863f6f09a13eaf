//! Severity ordering used to roll statuses up the suite tree

use crate::models::{Outcome, PendingState, Status};

/// Rank of a status when combining siblings; higher wins.
///
/// Pending markers keep the ordering a live report uses: work in flight
/// outranks any outcome, while an idle node only outranks a skipped one.
#[must_use]
pub fn severity(status: Status) -> u8 {
    match status {
        Status::Pending(PendingState::Running) => 7,
        Status::Pending(PendingState::Queued) => 6,
        Status::Terminal(Outcome::Error) => 5,
        Status::Terminal(Outcome::Fail) => 4,
        Status::Terminal(Outcome::Updated) => 3,
        Status::Terminal(Outcome::Success) => 2,
        Status::Pending(PendingState::Idle) => 1,
        Status::Terminal(Outcome::Skipped) => 0,
    }
}

/// Most severe of the supplied statuses, or `SUCCESS` when there are none.
pub fn determine_status<I>(statuses: I) -> Status
where
    I: IntoIterator<Item = Status>,
{
    statuses
        .into_iter()
        .max_by_key(|status| severity(*status))
        .unwrap_or(Status::SUCCESS)
}
