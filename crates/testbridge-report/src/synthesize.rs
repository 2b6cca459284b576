// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Report synthesis
//!
//! Folds a raw results document into a [`ReportTree`]. Skipped cases are
//! dropped, and a suite is only emitted when at least one of its cases
//! actually ran, so the report never shows an empty suite.

use std::path::Path;

use tracing::{debug, warn};

use crate::artifact::{CaseStatus, RawCaseRecord, RawDocument, RawSuiteRecord, read_results_artifact};
use crate::error::ReportError;
use crate::report::{AssertionContent, CaseReport, RawAssertion, ReportTree, SuiteReport};

/// Build a report tree from a parsed results document
#[must_use]
pub fn synthesize(document: &RawDocument) -> ReportTree {
    let suites: Vec<SuiteReport> = document.suites.iter().filter_map(synthesize_suite).collect();

    debug!(
        suites_in = document.suites.len(),
        suites_out = suites.len(),
        "Synthesized report tree"
    );
    ReportTree { suites }
}

/// Read the artifact at `path` and synthesize its report tree
///
/// # Errors
///
/// Returns `ReportError::ArtifactRead` or `ReportError::ArtifactFormat` when
/// the artifact cannot be read or parsed.
pub fn synthesize_from_artifact(path: impl AsRef<Path>) -> Result<ReportTree, ReportError> {
    let document = read_results_artifact(path)?;
    Ok(synthesize(&document))
}

fn synthesize_suite(suite: &RawSuiteRecord) -> Option<SuiteReport> {
    let mut report = SuiteReport::new(&suite.name);
    let mut suite_has_run = false;

    for case in &suite.data {
        if case.status.is_skipped() {
            continue;
        }
        suite_has_run = true;
        report.push(synthesize_case(&suite.name, case));
    }

    suite_has_run.then_some(report)
}

fn synthesize_case(suite: &str, case: &RawCaseRecord) -> CaseReport {
    if let CaseStatus::Other(status) = &case.status {
        warn!(
            suite = %suite,
            case = %case.name,
            status = %status,
            "Unexpected case status, reporting as failed"
        );
    }

    let content = match case.failure_message() {
        Some(error) => AssertionContent::Error(error.to_string()),
        None => AssertionContent::Duration(case.duration),
    };

    let assertion = RawAssertion {
        passed: case.status.is_pass(),
        description: case.name.clone(),
        content,
    };
    CaseReport::new(&case.name, assertion.into())
}
