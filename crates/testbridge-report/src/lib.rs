// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! testbridge-report: Results artifact processing for testbridge
//!
//! This library crate turns the native output of an external test binary into
//! a vendor-neutral report tree: the JSON results artifact written by a run,
//! and the plain-text inventory printed by `--list`.
//!
//! # Example
//!
//! ```no_run
//! use testbridge_report::{parse_discovery_output, parse_results_document, synthesize};
//!
//! let json = r#"[{"name":"S1","data":[{"name":"c1","status":"pass","duration":0.1,"error":null}]}]"#;
//! let tree = synthesize(&parse_results_document(json).unwrap());
//! assert_eq!(tree.len(), 1);
//!
//! let listed = parse_discovery_output("Suite1\n  CaseA\n");
//! assert_eq!(listed.names(), vec!["Suite1", "CaseA"]);
//! ```

pub mod artifact;
pub mod discovery;
pub mod error;
pub mod report;
pub mod synthesize;

pub use artifact::{
    CaseStatus, RawCaseRecord, RawDocument, RawSuiteRecord, parse_results_document,
    read_results_artifact,
};
pub use discovery::{DiscoveryEntry, DiscoveryTree, parse_discovery_output};
pub use error::ReportError;
pub use report::{
    Assertion, AssertionContent, CaseReport, RawAssertion, ReportTree, SuiteReport,
};
pub use synthesize::{synthesize, synthesize_from_artifact};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::discovery::{DiscoveryTree, parse_discovery_output};
    pub use crate::error::ReportError;
    pub use crate::report::{CaseReport, ReportTree, SuiteReport};
    pub use crate::synthesize::{synthesize, synthesize_from_artifact};
}
