// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Run report types

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use testbridge_report::ReportTree;
use uuid::Uuid;

/// Overall status of one test binary run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every reported case passed and the binary exited cleanly
    Passed,
    /// A case failed or the binary exited with a non-zero code
    Failed,
    /// No usable results artifact was produced
    Error,
}

/// Everything known about one run of a test binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Report name (the binary's file name)
    pub name: String,
    /// Unique run identifier
    pub run_id: Uuid,
    /// Absolute path of the test binary
    pub binary: PathBuf,
    /// Run-scoped directory holding the artifact and logs
    pub runpath: PathBuf,
    /// Resolved results artifact path
    pub artifact: PathBuf,
    /// When the subprocess was started
    pub started_at: DateTime<Utc>,
    /// When the report was completed
    pub finished_at: DateTime<Utc>,
    /// Exit code of the binary, if it exited normally
    pub exit_code: Option<i32>,
    /// Whether the binary was killed for exceeding its timeout
    pub timed_out: bool,
    /// Overall status
    pub status: RunStatus,
    /// Why the run errored or failed outside of test cases
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Synthesized suite/case tree
    pub suites: ReportTree,
    /// Captured standard output of the binary
    pub stdout_log: PathBuf,
    /// Captured standard error of the binary
    pub stderr_log: PathBuf,
}

impl RunReport {
    /// Check if the run passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == RunStatus::Passed
    }

    /// Wall-clock duration of the run in seconds
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Decide the run status from what the run produced
///
/// An artifact error always wins; otherwise any failing case or a non-zero
/// exit code fails the run.
#[must_use]
pub fn classify(suites: Option<&ReportTree>, exit_code: Option<i32>, timed_out: bool) -> RunStatus {
    match suites {
        None => RunStatus::Error,
        Some(tree) if !tree.all_passed() => RunStatus::Failed,
        Some(_) if timed_out || exit_code != Some(0) => RunStatus::Failed,
        Some(_) => RunStatus::Passed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;
    use testbridge_report::{CaseReport, RawAssertion, SuiteReport};

    fn tree(passed: bool) -> ReportTree {
        let mut suite = SuiteReport::new("S");
        suite.push(CaseReport::new(
            "c",
            RawAssertion {
                passed,
                description: "c".to_string(),
                content: testbridge_report::AssertionContent::Duration(0.0),
            }
            .into(),
        ));
        ReportTree {
            suites: vec![suite],
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(None, Some(0), false), RunStatus::Error);
        assert_eq!(classify(Some(&tree(true)), Some(0), false), RunStatus::Passed);
        assert_eq!(classify(Some(&tree(false)), Some(1), false), RunStatus::Failed);
        assert_eq!(classify(Some(&tree(true)), Some(2), false), RunStatus::Failed);
        assert_eq!(classify(Some(&tree(true)), None, true), RunStatus::Failed);
        assert_eq!(classify(Some(&ReportTree::new()), Some(0), false), RunStatus::Passed);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&RunStatus::Error).expect("serialize");
        assert_eq!(json, r#""error""#);
    }
}
