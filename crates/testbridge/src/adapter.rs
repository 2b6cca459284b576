// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test binary adapters
//!
//! A [`TestAdapter`] knows one test binary's conventions: how to ask it to run
//! and to list tests, and how to read what it writes. The generic
//! [`ProcessTestRunner`](crate::runner::ProcessTestRunner) handles the
//! subprocess itself and calls back into the adapter.

use std::path::Path;

use testbridge_report::{DiscoveryTree, ReportError, ReportTree, parse_discovery_output};

use crate::command::{Argv, TestRunConfig, build_list_command, build_run_command};

/// Strategy describing a test binary's command line and output formats
pub trait TestAdapter: Send + Sync {
    /// Argument vector that runs the configured tests and writes results to `artifact`
    fn run_command(&self, config: &TestRunConfig, artifact: &Path) -> Argv;

    /// Argument vector that enumerates the binary's tests
    fn list_command(&self, config: &TestRunConfig) -> Argv;

    /// Read the results artifact written by a run and build its report tree
    ///
    /// # Errors
    ///
    /// Returns a `ReportError` if the artifact is missing or malformed.
    fn synthesize_report(&self, artifact: &Path) -> Result<ReportTree, ReportError>;

    /// Parse the standard output of the list command
    fn parse_discovery(&self, output: &str) -> DiscoveryTree {
        parse_discovery_output(output)
    }
}

/// Adapter for Hobbes test binaries (`--json`, `--tests`, `--list`)
#[derive(Debug, Clone, Copy, Default)]
pub struct HobbesAdapter;

impl TestAdapter for HobbesAdapter {
    fn run_command(&self, config: &TestRunConfig, artifact: &Path) -> Argv {
        build_run_command(config, artifact)
    }

    fn list_command(&self, config: &TestRunConfig) -> Argv {
        build_list_command(config)
    }

    fn synthesize_report(&self, artifact: &Path) -> Result<ReportTree, ReportError> {
        testbridge_report::synthesize_from_artifact(artifact)
    }
}
