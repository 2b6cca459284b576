// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Subprocess execution
//!
//! The [`Executor`] trait is the seam between the runner and the operating
//! system. [`TokioExecutor`] spawns the binary with `tokio::process`, captures
//! its output and enforces the optional timeout; tests substitute their own
//! executor to script the binary's behaviour.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::command::Argv;

/// Errors raised while launching a subprocess
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The argument vector has no program
    #[error("Empty command line")]
    EmptyCommand,

    /// The program could not be spawned or waited on
    #[error("Failed to run {program}: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// A fully described subprocess invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program followed by its arguments
    pub argv: Argv,
    /// Working directory of the child
    pub cwd: PathBuf,
    /// Kill the child after this long
    pub timeout: Option<Duration>,
}

impl Invocation {
    /// Display form of the command line, for logs
    #[must_use]
    pub fn command_line(&self) -> String {
        self.argv
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of a finished (or killed) subprocess
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when killed by a signal or timed out
    pub exit_code: Option<i32>,
    /// Captured standard output
    pub stdout: Vec<u8>,
    /// Captured standard error
    pub stderr: Vec<u8>,
    /// Whether the child was killed for exceeding its timeout
    pub timed_out: bool,
}

impl ProcessOutput {
    /// Check if the process exited with code 0
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Standard output decoded lossily as UTF-8
    #[must_use]
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// Runs subprocesses on behalf of the test runner
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run `invocation` to completion (or timeout)
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if the program cannot be started.
    async fn execute(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError>;
}

/// Executor backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioExecutor;

#[async_trait]
impl Executor for TokioExecutor {
    async fn execute(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError> {
        let (program, args) = invocation
            .argv
            .split_first()
            .ok_or(ProcessError::EmptyCommand)?;
        let program_name = program.to_string_lossy().into_owned();

        debug!(
            command = %invocation.command_line(),
            cwd = %invocation.cwd.display(),
            "Spawning subprocess"
        );

        let child = Command::new(program)
            .args(args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: program_name.clone(),
                source,
            })?;

        let wait = child.wait_with_output();
        let output = match invocation.timeout {
            Some(limit) => match tokio::time::timeout(limit, wait).await {
                Ok(result) => result,
                Err(_) => {
                    // Dropping the future drops the child, which kills it
                    warn!(
                        program = %program_name,
                        timeout_secs = limit.as_secs_f64(),
                        "Subprocess timed out and was killed"
                    );
                    return Ok(ProcessOutput {
                        timed_out: true,
                        ..ProcessOutput::default()
                    });
                }
            },
            None => wait.await,
        }
        .map_err(|source| ProcessError::Spawn {
            program: program_name.clone(),
            source,
        })?;

        debug!(
            program = %program_name,
            exit_code = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "Subprocess finished"
        );

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
            timed_out: false,
        })
    }
}
