// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test binary invocation
//!
//! This module describes how a test binary is invoked: the validated run
//! configuration, the argument vectors for listing and running tests, and the
//! resolution of the results artifact path.
//!
//! ```text
//! run:  <binary> --json <artifact> [--tests <name>...] [<extra>...]
//! list: <binary> --list
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use testbridge::command::{TestRunConfig, build_run_command};
//!
//! let config = TestRunConfig::new("./build/hobbes-test")
//!     .expect("valid binary")
//!     .with_tests(["Arrays", "Compiler"]);
//! let artifact = config.artifact_path(Path::new("/runs/7"));
//! let argv = build_run_command(&config, &artifact);
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::ConfigError;

/// Flag asking the binary to write its results artifact to the following path
pub const RESULTS_FLAG: &str = "--json";

/// Flag introducing the names of the tests to run
pub const SELECTION_FLAG: &str = "--tests";

/// Flag asking the binary to enumerate its tests without running them
pub const LIST_FLAG: &str = "--list";

/// Artifact file name used when none is configured
pub const DEFAULT_ARTIFACT: &str = "report.json";

/// A subprocess argument vector; the first element is the program
pub type Argv = Vec<OsString>;

// ============================================================================
// Run Configuration
// ============================================================================

/// Configuration of one adapter invocation
///
/// Built with [`TestRunConfig::new`], which validates the binary and makes its
/// path absolute. The fields are public so callers that have validated the
/// binary themselves can construct the struct directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRunConfig {
    /// Absolute path to the test binary
    pub binary: PathBuf,
    /// Tests to run, in order; empty runs everything
    pub tests: Vec<String>,
    /// Configured results artifact path, relative to the run directory unless absolute
    pub artifact: PathBuf,
    /// Extra arguments appended verbatim
    pub extra_args: Vec<OsString>,
}

impl TestRunConfig {
    /// Validate `binary` and create a configuration that runs every test
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the path is empty, missing, not a regular
    /// file, or (on Unix) not executable.
    pub fn new(binary: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let binary = binary.as_ref();
        if binary.as_os_str().is_empty() {
            return Err(ConfigError::EmptyBinaryPath);
        }

        let binary = std::path::absolute(binary)
            .map_err(|e| ConfigError::BinaryPathUnresolvable(binary.to_path_buf(), e))?;

        let metadata = std::fs::metadata(&binary)
            .map_err(|_| ConfigError::BinaryNotFound(binary.clone()))?;
        if !metadata.is_file() {
            return Err(ConfigError::BinaryNotFile(binary));
        }
        if !is_executable(&metadata) {
            return Err(ConfigError::BinaryNotExecutable(binary));
        }

        Ok(Self {
            binary,
            tests: Vec::new(),
            artifact: PathBuf::from(DEFAULT_ARTIFACT),
            extra_args: Vec::new(),
        })
    }

    /// Restrict the run to the given tests, in order
    #[must_use]
    pub fn with_tests<I, S>(mut self, tests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tests = tests.into_iter().map(Into::into).collect();
        self
    }

    /// Set the configured results artifact path
    #[must_use]
    pub fn with_artifact(mut self, artifact: impl Into<PathBuf>) -> Self {
        self.artifact = artifact.into();
        self
    }

    /// Append extra raw arguments
    #[must_use]
    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Directory the binary runs from: the one that contains it
    ///
    /// The binary may look for resource files next to itself, so it is never
    /// run from the caller's current directory.
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        self.binary.parent().unwrap_or_else(|| Path::new("/"))
    }

    /// The artifact path for a run using `run_dir` as its run-scoped directory
    #[must_use]
    pub fn artifact_path(&self, run_dir: &Path) -> PathBuf {
        resolve_artifact_path(&self.artifact, run_dir)
    }

    /// File name of the binary, used to name reports
    #[must_use]
    pub fn name(&self) -> String {
        self.binary
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.binary.display().to_string())
    }
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    true
}

// ============================================================================
// Command Construction
// ============================================================================

/// Resolve the configured artifact path against the run-scoped directory
///
/// Absolute paths are returned unchanged; relative ones are joined under
/// `run_dir`.
#[must_use]
pub fn resolve_artifact_path(configured: &Path, run_dir: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        run_dir.join(configured)
    }
}

/// Build the argument vector that runs tests and writes results to `artifact`
#[must_use]
pub fn build_run_command(config: &TestRunConfig, artifact: &Path) -> Argv {
    let mut argv: Argv = vec![
        config.binary.clone().into_os_string(),
        RESULTS_FLAG.into(),
        artifact.as_os_str().to_owned(),
    ];

    if !config.tests.is_empty() {
        argv.push(SELECTION_FLAG.into());
        argv.extend(config.tests.iter().map(OsString::from));
    }

    argv.extend(config.extra_args.iter().cloned());
    argv
}

/// Build the argument vector that lists the binary's tests
#[must_use]
pub fn build_list_command(config: &TestRunConfig) -> Argv {
    vec![config.binary.clone().into_os_string(), LIST_FLAG.into()]
}
