// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! testbridge: run external test binaries and report their results
//!
//! `testbridge run` runs a test binary and prints the synthesized report as
//! JSON; `testbridge list` prints the binary's test inventory.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use serde::Serialize;
use tracing::{error, info};

use testbridge::adapter::HobbesAdapter;
use testbridge::config::{Command, Config};
use testbridge::runner::ProcessTestRunner;

/// Exit code for runs that failed or errored
const EXIT_TESTS_FAILED: u8 = 1;

/// Exit code for configuration and runner errors
const EXIT_USAGE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr so stdout only carries the JSON output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    match run(config).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

async fn run(config: Config) -> anyhow::Result<ExitCode> {
    let Some(command) = config.command.clone() else {
        Config::command().print_help()?;
        return Ok(ExitCode::from(EXIT_USAGE));
    };

    config.validate().context("Invalid configuration")?;
    let test_config = command
        .test_run_config()
        .context("Invalid test binary")?;

    let mut runner = ProcessTestRunner::new(HobbesAdapter, test_config);
    if let Some(timeout) = command.timeout() {
        runner = runner.with_timeout(timeout);
    }

    match command {
        Command::Run { .. } => {
            let report = runner
                .run(&config.runs_dir_path())
                .await
                .context("Test run failed")?;
            write_json(&report, command.output())?;

            info!(
                status = ?report.status,
                runpath = %report.runpath.display(),
                elapsed_secs = report.elapsed_secs(),
                "Report written"
            );
            Ok(if report.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_TESTS_FAILED)
            })
        }
        Command::List { .. } => {
            let listing = runner.list().await.context("Listing tests failed")?;
            write_json(&listing, command.output())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Write `value` as pretty JSON to `output`, or stdout when `None`
fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    match output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
