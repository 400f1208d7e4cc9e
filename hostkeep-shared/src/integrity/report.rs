//! Consistency reports
//!
//! Maintenance steps never fail the operation that triggered them. Each
//! failed step is appended to a [`ConsistencyReport`] and logged at `warn`,
//! and the report travels back to the caller next to the primary result.

use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Kind of maintenance step that went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MaintenanceStep {
    /// Appending a child to its parent's list
    Link,
    /// Removing a child from its old parent during a re-parent
    Unlink,
    /// Moving a user counter
    Counter,
    /// Deleting dependants of a removed parent
    Cascade,
}

impl fmt::Display for MaintenanceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MaintenanceStep::Link => "link",
            MaintenanceStep::Unlink => "unlink",
            MaintenanceStep::Counter => "counter",
            MaintenanceStep::Cascade => "cascade",
        };
        f.write_str(name)
    }
}

/// One failed maintenance step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyIssue {
    pub step: MaintenanceStep,
    /// What was being updated, e.g. `customers.houses/<id>`
    pub target: String,
    pub detail: String,
}

/// Records removed by cascades
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedCounts {
    pub houses: usize,
    pub tasks: usize,
    pub bookings: usize,
}

/// Outcome of the maintenance steps of one operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    pub issues: Vec<ConsistencyIssue>,
    pub removed: RemovedCounts,
}

impl ConsistencyReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an issue and logs it
    pub fn record(
        &mut self,
        step: MaintenanceStep,
        target: impl Into<String>,
        detail: impl Into<String>,
    ) {
        let issue = ConsistencyIssue {
            step,
            target: target.into(),
            detail: detail.into(),
        };
        warn!(
            step = %issue.step,
            target = %issue.target,
            detail = %issue.detail,
            "Consistency maintenance step failed"
        );
        self.issues.push(issue);
    }

    /// True when every maintenance step succeeded
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// A primary result with the report of its maintenance steps
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub record: T,
    pub report: ConsistencyReport,
}

impl<T> Outcome<T> {
    pub fn new(record: T, report: ConsistencyReport) -> Self {
        Self { record, report }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_marks_report_dirty() {
        let mut report = ConsistencyReport::new();
        assert!(report.is_clean());

        report.record(MaintenanceStep::Link, "customers.houses/x", "parent not found");

        assert!(!report.is_clean());
        assert_eq!(report.issues[0].step, MaintenanceStep::Link);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let mut report = ConsistencyReport::new();
        report.removed.tasks = 2;

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["removed"]["tasks"], 2);
        assert!(json["issues"].as_array().unwrap().is_empty());
    }
}
