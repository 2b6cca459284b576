//! Configuration for the testbridge CLI
//!
//! This module provides the command-line configuration: the subcommands, the
//! run-scoped directory root, and logging options.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::command::{DEFAULT_ARTIFACT, TestRunConfig};

/// testbridge - run external test binaries and report their results
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "testbridge")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Root directory for run-scoped directories
    ///
    /// Each run gets its own `<runs-dir>/<run-id>` directory holding the
    /// results artifact and the captured output logs.
    /// Defaults to ~/.local/share/testbridge/runs (or platform equivalent).
    #[arg(long, env = "TESTBRIDGE_RUNS_DIR")]
    pub runs_dir: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr; stdout carries the JSON report.
    #[arg(short, long, default_value = "false", conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run tests and print the synthesized report as JSON
    ///
    /// Example:
    ///   testbridge run --binary ./build/hobbes-test --tests Arrays,Compiler -- --seed 3
    Run {
        /// Path to the test binary
        #[arg(short, long, env = "TESTBRIDGE_BINARY")]
        binary: PathBuf,

        /// Tests to run (repeatable or comma-separated); all tests when omitted
        #[arg(short, long, value_delimiter = ',')]
        tests: Vec<String>,

        /// Results artifact path, relative to the run directory unless absolute
        #[arg(long, default_value = DEFAULT_ARTIFACT)]
        json: PathBuf,

        /// Kill the binary after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Extra arguments passed verbatim to the test binary
        #[arg(last = true)]
        extra_args: Vec<String>,
    },

    /// List the binary's tests and print them as JSON
    List {
        /// Path to the test binary
        #[arg(short, long, env = "TESTBRIDGE_BINARY")]
        binary: PathBuf,

        /// Kill the binary after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Write the listing to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Command {
    /// Validate the binary and build the run configuration
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the test binary is not usable.
    pub fn test_run_config(&self) -> Result<TestRunConfig, ConfigError> {
        match self {
            Self::Run {
                binary,
                tests,
                json,
                extra_args,
                ..
            } => Ok(TestRunConfig::new(binary)?
                .with_tests(tests.iter().cloned())
                .with_artifact(json.clone())
                .with_extra_args(extra_args.iter().cloned())),
            Self::List { binary, .. } => TestRunConfig::new(binary),
        }
    }

    /// Configured timeout, if any
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        match self {
            Self::Run { timeout, .. } | Self::List { timeout, .. } => {
                timeout.map(Duration::from_secs)
            }
        }
    }

    /// Where to write the JSON output, `None` for stdout
    #[must_use]
    pub fn output(&self) -> Option<&Path> {
        match self {
            Self::Run { output, .. } | Self::List { output, .. } => output.as_deref(),
        }
    }
}

impl Config {
    /// Get the runs directory, using a default if not specified
    ///
    /// Default location is platform-specific:
    /// - macOS: ~/Library/Application Support/testbridge/runs
    /// - Linux: ~/.local/share/testbridge/runs
    /// - Windows: %LOCALAPPDATA%\testbridge\runs
    #[must_use]
    pub fn runs_dir_path(&self) -> PathBuf {
        self.runs_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("testbridge")
                .join("runs")
        })
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the runs directory exists but is not a directory,
    /// or cannot be created.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let runs_dir = self.runs_dir_path();
        if runs_dir.exists() {
            if !runs_dir.is_dir() {
                return Err(ConfigError::RunsDirNotDirectory(runs_dir));
            }
        } else {
            std::fs::create_dir_all(&runs_dir)
                .map_err(|e| ConfigError::RunsDirCreateFailed(runs_dir.clone(), e))?;
        }
        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No binary path was given
    #[error("Test binary path is empty")]
    EmptyBinaryPath,

    /// The binary path could not be made absolute
    #[error("Cannot resolve test binary path {0}: {1}")]
    BinaryPathUnresolvable(PathBuf, std::io::Error),

    /// Nothing exists at the binary path
    #[error("Test binary not found: {0}")]
    BinaryNotFound(PathBuf),

    /// The binary path exists but is not a regular file
    #[error("Test binary is not a file: {0}")]
    BinaryNotFile(PathBuf),

    /// The binary has no execute permission
    #[error("Test binary is not executable: {0}")]
    BinaryNotExecutable(PathBuf),

    /// Runs directory path is not a directory
    #[error("Runs directory is not a directory: {0}")]
    RunsDirNotDirectory(PathBuf),

    /// Failed to create the runs directory
    #[error("Failed to create runs directory {0}: {1}")]
    RunsDirCreateFailed(PathBuf, std::io::Error),
}
