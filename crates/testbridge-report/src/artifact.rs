// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Results artifact parsing
//!
//! The test binary writes its results (when invoked with `--json <file>`) as a
//! JSON array of suites, each holding the records of its test cases:
//!
//! ```json
//! [
//!   {
//!     "name": "Arrays",
//!     "data": [
//!       {"name": "canSort", "status": "pass", "duration": 0.1, "error": null},
//!       {"name": "canSlice", "status": "skipped", "duration": 0, "error": null}
//!     ]
//!   }
//! ]
//! ```
//!
//! # Example
//!
//! ```no_run
//! use testbridge_report::artifact::read_results_artifact;
//!
//! let document = read_results_artifact("/runs/7/report.json").unwrap();
//! println!("{} suites", document.suites.len());
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ReportError;

// ============================================================================
// Document Types
// ============================================================================

/// The whole results document, in the order the binary wrote it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDocument {
    /// Suite records in document order
    pub suites: Vec<RawSuiteRecord>,
}

/// One logical test group in the results document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSuiteRecord {
    /// Suite name, used as the report node identifier
    pub name: String,
    /// Case records in document order
    pub data: Vec<RawCaseRecord>,
}

/// One test case entry within a suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCaseRecord {
    /// Test case name
    pub name: String,
    /// Reported status
    pub status: CaseStatus,
    /// Duration as reported by the binary (units are the binary's own)
    #[serde(default)]
    pub duration: f64,
    /// Failure text, `null` or absent when the case did not fail
    #[serde(default)]
    pub error: Option<String>,
}

impl RawCaseRecord {
    /// The error text, if the binary reported a non-empty one
    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// Status of a case record
///
/// The binary only documents `pass`, `fail` and `skipped`. Anything else is
/// kept verbatim in [`CaseStatus::Other`] and treated as a failing result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CaseStatus {
    /// Case passed
    Pass,
    /// Case failed
    Fail,
    /// Case was not executed
    Skipped,
    /// Undocumented status value
    Other(String),
}

impl CaseStatus {
    /// Check if the case passed
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Check if the case was skipped
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// The status string as it appears in the document
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skipped => "skipped",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for CaseStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pass" => Self::Pass,
            "fail" => Self::Fail,
            "skipped" => Self::Skipped,
            _ => Self::Other(s),
        }
    }
}

impl From<CaseStatus> for String {
    fn from(status: CaseStatus) -> Self {
        match status {
            CaseStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Parsing Functions
// ============================================================================

/// Parse a results document held in memory
///
/// # Errors
///
/// Returns `ReportError::JsonParse` if the JSON is invalid or not an array of
/// suite records.
pub fn parse_results_document(json: &str) -> Result<RawDocument, ReportError> {
    serde_json::from_str(json).map_err(ReportError::from)
}

/// Read and parse the results artifact at `path`
///
/// # Errors
///
/// Returns `ReportError::ArtifactRead` if the file is absent or unreadable,
/// and `ReportError::ArtifactFormat` if its content is not a results document.
pub fn read_results_artifact(path: impl AsRef<Path>) -> Result<RawDocument, ReportError> {
    let path = path.as_ref();
    let content = std::fs::read(path).map_err(|source| ReportError::ArtifactRead {
        path: path.to_path_buf(),
        source,
    })?;

    // Bad UTF-8 surfaces as a format error
    let document: RawDocument =
        serde_json::from_slice(&content).map_err(|source| ReportError::ArtifactFormat {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        path = %path.display(),
        suites = document.suites.len(),
        "Read results artifact"
    );
    Ok(document)
}
