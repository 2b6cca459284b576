// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! testbridge library
//!
//! Drives an external, pre-compiled test binary as a subprocess and converts
//! its native output into the report tree of `testbridge-report`. This module
//! exports the runner for use in integration tests and as a library.

pub mod adapter;
pub mod command;
pub mod config;
pub mod outcome;
pub mod process;
pub mod runner;

pub use adapter::{HobbesAdapter, TestAdapter};
pub use command::{TestRunConfig, build_list_command, build_run_command, resolve_artifact_path};
pub use config::ConfigError;
pub use outcome::{RunReport, RunStatus};
pub use process::{Executor, Invocation, ProcessOutput, TokioExecutor};
pub use runner::{ProcessTestRunner, RunnerError};
