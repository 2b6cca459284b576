// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Process test runner
//!
//! [`ProcessTestRunner`] drives one test binary through a [`TestAdapter`]:
//!
//! 1. Create the run-scoped directory `<runs-root>/<run-id>`
//! 2. Build the run command and spawn it from the binary's own directory
//! 3. Save the captured stdout/stderr next to the artifact
//! 4. Read the results artifact and synthesize the report tree
//!
//! A missing or malformed artifact does not abort the runner; the run is
//! reported with [`RunStatus::Error`] instead.
//!
//! # Example
//!
//! ```no_run
//! use testbridge::adapter::HobbesAdapter;
//! use testbridge::command::TestRunConfig;
//! use testbridge::runner::ProcessTestRunner;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = TestRunConfig::new("./build/hobbes-test")?;
//! let runner = ProcessTestRunner::new(HobbesAdapter, config);
//! let report = runner.run(std::path::Path::new("/tmp/testbridge-runs")).await?;
//! println!("{:?}: {} cases", report.status, report.suites.case_count());
//! # Ok(())
//! # }
//! ```
//!
//! [`RunStatus::Error`]: crate::outcome::RunStatus::Error

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use testbridge_report::DiscoveryTree;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::adapter::TestAdapter;
use crate::command::TestRunConfig;
use crate::outcome::{RunReport, RunStatus, classify};
use crate::process::{Executor, Invocation, ProcessError, ProcessOutput, TokioExecutor};

/// File the binary's standard output is saved to, inside the run directory
pub const STDOUT_LOG: &str = "stdout.log";

/// File the binary's standard error is saved to, inside the run directory
pub const STDERR_LOG: &str = "stderr.log";

// ============================================================================
// Error Types
// ============================================================================

/// Errors that abort a runner invocation
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The subprocess could not be started
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    /// The run-scoped directory could not be prepared
    #[error("Cannot prepare run directory {}: {source}", path.display())]
    RunDirectory {
        /// Directory that could not be created or cleaned
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The list command was killed before it finished
    #[error("Listing tests did not complete: {problem}")]
    ListInterrupted {
        /// How the process ended
        problem: String,
    },

    /// A captured output log could not be written
    #[error("Cannot write log {}: {source}", path.display())]
    Log {
        /// Log file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// Runner
// ============================================================================

/// Generic subprocess test runner parameterised by an adapter and an executor
pub struct ProcessTestRunner<A, E = TokioExecutor> {
    adapter: A,
    executor: E,
    config: TestRunConfig,
    timeout: Option<Duration>,
}

impl<A: TestAdapter> ProcessTestRunner<A, TokioExecutor> {
    /// Create a runner that spawns real subprocesses
    #[must_use]
    pub fn new(adapter: A, config: TestRunConfig) -> Self {
        Self::with_executor(adapter, TokioExecutor, config)
    }
}

impl<A: TestAdapter, E: Executor> ProcessTestRunner<A, E> {
    /// Create a runner using a custom executor
    #[must_use]
    pub fn with_executor(adapter: A, executor: E, config: TestRunConfig) -> Self {
        Self {
            adapter,
            executor,
            config,
            timeout: None,
        }
    }

    /// Kill the binary if a run or listing takes longer than `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The run configuration
    #[must_use]
    pub fn config(&self) -> &TestRunConfig {
        &self.config
    }

    /// The executor used to spawn the binary
    #[must_use]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run the configured tests in a fresh directory under `runs_root`
    ///
    /// # Errors
    ///
    /// See [`ProcessTestRunner::run_in`].
    pub async fn run(&self, runs_root: &Path) -> Result<RunReport, RunnerError> {
        let run_id = Uuid::new_v4();
        let runpath = runs_root.join(run_id.to_string());
        self.run_in(run_id, &runpath).await
    }

    /// Run the configured tests using `runpath` as the run-scoped directory
    ///
    /// # Errors
    ///
    /// Returns `RunnerError` if the run directory cannot be resolved or
    /// prepared, the binary cannot be spawned, or its output logs cannot be
    /// written. Problems with the results artifact are reported in the
    /// returned `RunReport`.
    ///
    /// A relative `runpath` is resolved against the current directory.
    pub async fn run_in(&self, run_id: Uuid, runpath: &Path) -> Result<RunReport, RunnerError> {
        // The binary runs from its own directory; it must be handed absolute paths
        let runpath = std::path::absolute(runpath).map_err(run_directory_error(runpath))?;
        let runpath = runpath.as_path();
        let artifact = self.config.artifact_path(runpath);
        prepare_run_directory(runpath, &artifact)?;

        let invocation = Invocation {
            argv: self.adapter.run_command(&self.config, &artifact),
            cwd: self.config.working_dir().to_path_buf(),
            timeout: self.timeout,
        };

        info!(
            run_id = %run_id,
            binary = %self.config.binary.display(),
            tests = self.config.tests.len(),
            "Running test binary"
        );
        debug!(command = %invocation.command_line(), "Run command");

        let started_at = Utc::now();
        let output = self.executor.execute(&invocation).await?;

        let stdout_log = runpath.join(STDOUT_LOG);
        let stderr_log = runpath.join(STDERR_LOG);
        write_log(&stdout_log, &output.stdout)?;
        write_log(&stderr_log, &output.stderr)?;

        let (suites, error) = match self.adapter.synthesize_report(&artifact) {
            Ok(tree) => {
                let error = process_failure(&output, self.timeout);
                (Some(tree), error)
            }
            Err(e) => {
                warn!(
                    run_id = %run_id,
                    artifact = %artifact.display(),
                    error = %e,
                    "No usable results artifact"
                );
                let error = match process_failure(&output, self.timeout) {
                    Some(process) => format!("{e} ({process})"),
                    None => e.to_string(),
                };
                (None, Some(error))
            }
        };

        let status = classify(suites.as_ref(), output.exit_code, output.timed_out);
        let suites = suites.unwrap_or_default();

        match status {
            RunStatus::Passed | RunStatus::Failed => info!(
                run_id = %run_id,
                status = ?status,
                passed = suites.passed_count(),
                failed = suites.failed_count(),
                "Test run completed"
            ),
            RunStatus::Error => warn!(run_id = %run_id, "Test run errored"),
        }

        Ok(RunReport {
            name: self.config.name(),
            run_id,
            binary: self.config.binary.clone(),
            runpath: runpath.to_path_buf(),
            artifact,
            started_at,
            finished_at: Utc::now(),
            exit_code: output.exit_code,
            timed_out: output.timed_out,
            status,
            error,
            suites,
            stdout_log,
            stderr_log,
        })
    }

    /// List the binary's tests
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Process` if the binary cannot be spawned, and
    /// `RunnerError::ListInterrupted` if it timed out or was killed by a signal.
    /// A non-zero exit code is only logged.
    pub async fn list(&self) -> Result<DiscoveryTree, RunnerError> {
        let invocation = Invocation {
            argv: self.adapter.list_command(&self.config),
            cwd: self.config.working_dir().to_path_buf(),
            timeout: self.timeout,
        };

        info!(binary = %self.config.binary.display(), "Listing tests");
        let output = self.executor.execute(&invocation).await?;
        match process_failure(&output, self.timeout) {
            // Output of a killed listing is incomplete
            Some(problem) if output.timed_out || output.exit_code.is_none() => {
                return Err(RunnerError::ListInterrupted { problem });
            }
            Some(problem) => {
                warn!(binary = %self.config.binary.display(), "List command {problem}");
            }
            None => {}
        }

        let tree = self.adapter.parse_discovery(&output.stdout_text());
        debug!(entries = tree.len(), "Parsed test listing");
        Ok(tree)
    }
}

fn prepare_run_directory(runpath: &Path, artifact: &Path) -> Result<(), RunnerError> {
    std::fs::create_dir_all(runpath).map_err(run_directory_error(runpath))?;
    if let Some(parent) = artifact.parent() {
        std::fs::create_dir_all(parent).map_err(run_directory_error(parent))?;
    }

    // A leftover artifact would be mistaken for this run's results
    if artifact.exists() {
        debug!(artifact = %artifact.display(), "Removing stale results artifact");
        std::fs::remove_file(artifact).map_err(run_directory_error(artifact))?;
    }
    Ok(())
}

fn run_directory_error(path: &Path) -> impl FnOnce(std::io::Error) -> RunnerError {
    let path = path.to_path_buf();
    move |source| RunnerError::RunDirectory { path, source }
}

fn write_log(path: &Path, content: &[u8]) -> Result<(), RunnerError> {
    std::fs::write(path, content).map_err(|source| RunnerError::Log {
        path: path.to_path_buf(),
        source,
    })
}

/// Describe how the process ended, when it did not exit cleanly
fn process_failure(output: &ProcessOutput, timeout: Option<Duration>) -> Option<String> {
    if output.timed_out {
        let secs = timeout.map(|t| t.as_secs_f64()).unwrap_or_default();
        return Some(format!("timed out after {secs}s"));
    }
    match output.exit_code {
        Some(0) => None,
        Some(code) => Some(format!("exited with code {code}")),
        None => Some("terminated by signal".to_string()),
    }
}
