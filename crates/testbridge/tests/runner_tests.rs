// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Tests for the process test runner
//!
//! This module tests:
//! - Command line and working directory handed to the executor
//! - Report synthesis after a run
//! - Artifact errors folded into the run report
//! - Test listing
//! - Real subprocess runs against a scripted test binary (Unix only)


use std::ffi::OsString;
use std::path::{Path, PathBuf};

use similar_asserts::assert_eq;
use uuid::Uuid;

use fixtures::{MIXED_ARTIFACT, PASSING_ARTIFACT, ScriptedExecutor, sample_config};
use test_utils::TempTestDir;
use testbridge::adapter::HobbesAdapter;
use testbridge::outcome::RunStatus;
use testbridge::runner::{ProcessTestRunner, RunnerError, STDERR_LOG, STDOUT_LOG};
use testbridge_report::AssertionContent;

fn argv(parts: &[&str]) -> Vec<OsString> {
    parts.iter().map(OsString::from).collect()
}

// ============================================================================
// Run Command Contract
// ============================================================================

#[tokio::test]
async fn test_run_invokes_binary_from_its_directory() {
    let temp = TempTestDir::new("run_cwd");
    let runner = ProcessTestRunner::with_executor(
        HobbesAdapter,
        ScriptedExecutor::writing(PASSING_ARTIFACT, 0),
        sample_config(),
    );

    let runpath = temp.path().join("run-1");
    runner
        .run_in(Uuid::new_v4(), &runpath)
        .await
        .expect("run should succeed");

    let invocations = runner_invocations(&runner);
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].cwd, Path::new("/opt/tests"));

    let artifact = runpath.join("report.json");
    assert_eq!(
        invocations[0].argv,
        argv(&[
            "/opt/tests/hobbes-test",
            "--json",
            artifact.to_str().expect("utf-8 path"),
        ])
    );
}

#[tokio::test]
async fn test_run_passes_selection_and_extra_args_in_order() {
    let temp = TempTestDir::new("run_selection");
    let config = sample_config()
        .with_tests(["Compiler", "Arrays"])
        .with_extra_args(["--seed", "3"])
        .with_artifact("out.json");
    let runner = ProcessTestRunner::with_executor(
        HobbesAdapter,
        ScriptedExecutor::writing(PASSING_ARTIFACT, 0),
        config,
    );

    let runpath = temp.path().join("run-7");
    runner
        .run_in(Uuid::new_v4(), &runpath)
        .await
        .expect("run should succeed");

    let artifact = runpath.join("out.json");
    assert_eq!(
        runner_invocations(&runner)[0].argv,
        argv(&[
            "/opt/tests/hobbes-test",
            "--json",
            artifact.to_str().expect("utf-8 path"),
            "--tests",
            "Compiler",
            "Arrays",
            "--seed",
            "3",
        ])
    );
}

#[tokio::test]
async fn test_absolute_artifact_path_is_used_as_is() {
    let temp = TempTestDir::new("run_absolute");
    let artifact = temp.path().join("elsewhere").join("results.json");
    let runner = ProcessTestRunner::with_executor(
        HobbesAdapter,
        ScriptedExecutor::writing(PASSING_ARTIFACT, 0),
        sample_config().with_artifact(artifact.clone()),
    );

    let report = runner
        .run_in(Uuid::new_v4(), &temp.path().join("run"))
        .await
        .expect("run should succeed");

    assert_eq!(report.artifact, artifact);
    assert!(artifact.exists());
    assert_eq!(report.status, RunStatus::Passed);
}

#[tokio::test]
async fn test_relative_runpath_is_handed_over_absolute() {
    let runner = ProcessTestRunner::with_executor(
        HobbesAdapter,
        ScriptedExecutor::writing(PASSING_ARTIFACT, 0),
        sample_config(),
    );

    let runpath = PathBuf::from(format!("testbridge-relative-run-{}", Uuid::new_v4()));
    let result = runner.run_in(Uuid::new_v4(), &runpath).await;
    let _ = std::fs::remove_dir_all(&runpath);
    let report = result.expect("run should succeed");

    let expected = std::path::absolute(&runpath)
        .expect("absolute runpath")
        .join("report.json");
    assert_eq!(report.artifact, expected);
    assert_eq!(runner_invocations(&runner)[0].argv[2], expected.into_os_string());
    assert_eq!(report.status, RunStatus::Passed);
}

// ============================================================================
// Report Synthesis
// ============================================================================

#[tokio::test]
async fn test_run_synthesizes_report() {
    let temp = TempTestDir::new("run_report");
    let runner = ProcessTestRunner::with_executor(
        HobbesAdapter,
        ScriptedExecutor::writing(MIXED_ARTIFACT, 1),
        sample_config(),
    );

    let run_id = Uuid::new_v4();
    let runpath = temp.path().join(run_id.to_string());
    let report = runner
        .run_in(run_id, &runpath)
        .await
        .expect("run should succeed");

    assert_eq!(report.name, "hobbes-test");
    assert_eq!(report.run_id, run_id);
    assert_eq!(report.runpath, runpath);
    assert_eq!(report.status, RunStatus::Failed);
    assert_eq!(report.exit_code, Some(1));
    assert_eq!(report.error.as_deref(), Some("exited with code 1"));

    let suites: Vec<&str> = report.suites.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(suites, vec!["Arrays", "Compiler"]);
    assert_eq!(report.suites.suites[0].cases.len(), 1);

    let inline = &report.suites.suites[1].cases[0];
    assert!(!inline.passed());
    assert_eq!(
        inline.assertion.content(),
        &AssertionContent::Error("assertion X failed".to_string())
    );
    assert!(report.finished_at >= report.started_at);
}

#[tokio::test]
async fn test_run_writes_output_logs() {
    let temp = TempTestDir::new("run_logs");
    let mut executor = ScriptedExecutor::writing(PASSING_ARTIFACT, 0);
    executor.output.stdout = b"3 tests run\n".to_vec();
    executor.output.stderr = b"warning: slow\n".to_vec();
    let runner = ProcessTestRunner::with_executor(HobbesAdapter, executor, sample_config());

    let runpath = temp.path().join("run");
    let report = runner
        .run_in(Uuid::new_v4(), &runpath)
        .await
        .expect("run should succeed");

    assert_eq!(report.stdout_log, runpath.join(STDOUT_LOG));
    assert_eq!(report.stderr_log, runpath.join(STDERR_LOG));
    assert_eq!(
        std::fs::read_to_string(&report.stdout_log).expect("stdout log"),
        "3 tests run\n"
    );
    assert_eq!(
        std::fs::read_to_string(&report.stderr_log).expect("stderr log"),
        "warning: slow\n"
    );
}

#[tokio::test]
async fn test_run_creates_unique_run_directories() {
    let temp = TempTestDir::new("run_unique");
    let runner = ProcessTestRunner::with_executor(
        HobbesAdapter,
        ScriptedExecutor::writing(PASSING_ARTIFACT, 0),
        sample_config(),
    );

    let first = runner.run(temp.path()).await.expect("first run");
    let second = runner.run(temp.path()).await.expect("second run");

    assert_ne!(first.run_id, second.run_id);
    assert_ne!(first.runpath, second.runpath);
    assert_eq!(first.runpath, temp.path().join(first.run_id.to_string()));
    assert!(first.artifact.exists());
    assert!(second.artifact.exists());
}

// ============================================================================
// Artifact Errors
// ============================================================================

#[tokio::test]
async fn test_missing_artifact_reports_error_status() {
    let temp = TempTestDir::new("run_missing");
    let runner = ProcessTestRunner::with_executor(
        HobbesAdapter,
        ScriptedExecutor::printing("crashed before writing results", 134),
        sample_config(),
    );

    let report = runner
        .run_in(Uuid::new_v4(), &temp.path().join("run"))
        .await
        .expect("artifact errors are reported, not raised");

    assert_eq!(report.status, RunStatus::Error);
    assert!(report.suites.is_empty());
    let error = report.error.expect("error should be set");
    assert!(error.contains("Failed to read results artifact"), "{error}");
    assert!(error.contains("exited with code 134"), "{error}");
}

#[tokio::test]
async fn test_malformed_artifact_reports_error_status() {
    let temp = TempTestDir::new("run_malformed");
    let runner = ProcessTestRunner::with_executor(
        HobbesAdapter,
        ScriptedExecutor::writing(r#"{"not": "a suite list"}"#, 0),
        sample_config(),
    );

    let report = runner
        .run_in(Uuid::new_v4(), &temp.path().join("run"))
        .await
        .expect("artifact errors are reported, not raised");

    assert_eq!(report.status, RunStatus::Error);
    let error = report.error.expect("error should be set");
    assert!(error.contains("Malformed results artifact"), "{error}");
}

#[tokio::test]
async fn test_stale_artifact_is_not_reused() {
    let temp = TempTestDir::new("run_stale");
    let artifact = temp.create_file("shared/report.json", PASSING_ARTIFACT);
    let runner = ProcessTestRunner::with_executor(
        HobbesAdapter,
        ScriptedExecutor::printing("", 0),
        sample_config().with_artifact(artifact.clone()),
    );

    let report = runner
        .run_in(Uuid::new_v4(), &temp.path().join("run"))
        .await
        .expect("run should complete");

    assert_eq!(report.status, RunStatus::Error);
    assert!(!artifact.exists());
}

#[tokio::test]
async fn test_all_skipped_run_passes_with_empty_tree() {
    let temp = TempTestDir::new("run_skipped");
    let runner = ProcessTestRunner::with_executor(
        HobbesAdapter,
        ScriptedExecutor::writing(
            r#"[{"name":"S2","data":[{"name":"c1","status":"skipped","duration":0,"error":null}]}]"#,
            0,
        ),
        sample_config(),
    );

    let report = runner
        .run_in(Uuid::new_v4(), &temp.path().join("run"))
        .await
        .expect("run should succeed");

    assert!(report.suites.is_empty());
    assert_eq!(report.status, RunStatus::Passed);
    assert!(report.error.is_none());
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_list_parses_stdout() {
    let executor = ScriptedExecutor::printing("Suite1\n  CaseA\n  CaseB\n", 0);
    let runner = ProcessTestRunner::with_executor(HobbesAdapter, executor, sample_config());

    let tree = runner.list().await.expect("list should succeed");
    assert_eq!(tree.names(), vec!["Suite1", "CaseA", "CaseB"]);

    let invocations = runner_invocations(&runner);
    assert_eq!(invocations[0].argv, argv(&["/opt/tests/hobbes-test", "--list"]));
    assert_eq!(invocations[0].cwd, Path::new("/opt/tests"));
}

#[tokio::test]
async fn test_list_tolerates_non_zero_exit() {
    let executor = ScriptedExecutor::printing("Arrays\n", 1);
    let runner = ProcessTestRunner::with_executor(HobbesAdapter, executor, sample_config());

    let tree = runner.list().await.expect("list should succeed");
    assert_eq!(tree.names(), vec!["Arrays"]);
}

#[tokio::test]
async fn test_list_timeout_is_an_error() {
    let mut executor = ScriptedExecutor::printing("Arrays\n", 0);
    executor.output.exit_code = None;
    executor.output.timed_out = true;
    let runner = ProcessTestRunner::with_executor(HobbesAdapter, executor, sample_config())
        .with_timeout(std::time::Duration::from_secs(2));

    let err = runner.list().await.expect_err("timed out listing should fail");
    assert!(matches!(err, RunnerError::ListInterrupted { .. }), "{err}");
    assert!(err.to_string().contains("timed out after 2s"), "{err}");
}

#[tokio::test]
async fn test_list_killed_by_signal_is_an_error() {
    let mut executor = ScriptedExecutor::printing("", 0);
    executor.output.exit_code = None;
    let runner = ProcessTestRunner::with_executor(HobbesAdapter, executor, sample_config());

    let err = runner.list().await.expect_err("killed listing should fail");
    assert!(err.to_string().contains("terminated by signal"), "{err}");
}

// ============================================================================
// Real Subprocess (Unix)
// ============================================================================

/// Script standing in for a test binary: lists three suites, checks that it
/// runs next to its resource file, and writes a results artifact
#[cfg(unix)]
const SCRIPT_BINARY: &str = r#"
if [ "$1" = "--list" ]; then
  printf 'MyHobbesTest\n  Arrays\n  Compiler\n'
  exit 0
fi
if [ ! -f ./resource.dat ]; then
  echo "resource.dat not found" >&2
  exit 2
fi
echo "args: $*"
cat > "$2" <<'JSON'
[{"name":"Arrays","data":[{"name":"canSort","status":"pass","duration":0.1,"error":null},{"name":"canSlice","status":"skipped","duration":0,"error":null}]}]
JSON
exit 0
"#;

#[cfg(unix)]
#[tokio::test]
async fn test_real_binary_run() {
    let temp = TempTestDir::new("real_run");
    let bin_dir = temp.create_subdir("bin");
    temp.create_file("bin/resource.dat", "data");
    let binary = temp.create_script("bin/hobbes-test", SCRIPT_BINARY);

    let config = testbridge::TestRunConfig::new(&binary)
        .expect("script should be a valid binary")
        .with_tests(["Arrays"]);
    assert_eq!(config.working_dir(), bin_dir.as_path());

    let runner = ProcessTestRunner::new(HobbesAdapter, config);
    let report = runner
        .run(&temp.path().join("runs"))
        .await
        .expect("run should succeed");

    assert_eq!(report.status, RunStatus::Passed, "{:?}", report.error);
    assert_eq!(report.exit_code, Some(0));
    assert_eq!(report.suites.len(), 1);
    assert_eq!(report.suites.case_count(), 1);

    let stdout = std::fs::read_to_string(&report.stdout_log).expect("stdout log");
    assert!(stdout.contains("--tests Arrays"), "{stdout}");
}

#[cfg(unix)]
#[tokio::test]
async fn test_real_binary_relative_runs_root() {
    let temp = TempTestDir::new("real_relative");
    temp.create_file("bin/resource.dat", "data");
    let binary = temp.create_script("bin/hobbes-test", SCRIPT_BINARY);

    let config = testbridge::TestRunConfig::new(&binary).expect("valid binary");
    let runner = ProcessTestRunner::new(HobbesAdapter, config);

    // Relative to the test process's directory, not the binary's
    let runs_root = PathBuf::from(format!("testbridge-relative-runs-{}", Uuid::new_v4()));
    let result = runner.run(&runs_root).await;
    let absolute_root = std::path::absolute(&runs_root).expect("absolute runs root");
    let _ = std::fs::remove_dir_all(&runs_root);
    let report = result.expect("run should succeed");

    assert_eq!(report.status, RunStatus::Passed, "{:?}", report.error);
    assert!(report.runpath.is_absolute());
    assert!(report.runpath.starts_with(&absolute_root));
    assert!(report.artifact.is_absolute());
    assert_eq!(report.suites.case_count(), 1);
    assert!(!temp.path().join("bin").join(&runs_root).exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_real_binary_list() {
    let temp = TempTestDir::new("real_list");
    let binary = temp.create_script("hobbes-test", SCRIPT_BINARY);

    let config = testbridge::TestRunConfig::new(&binary).expect("valid binary");
    let runner = ProcessTestRunner::new(HobbesAdapter, config);

    let tree = runner.list().await.expect("list should succeed");
    assert_eq!(tree.names(), vec!["MyHobbesTest", "Arrays", "Compiler"]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_real_binary_timeout() {
    let temp = TempTestDir::new("real_timeout");
    let binary = temp.create_script("slow-test", "sleep 10\n");

    let config = testbridge::TestRunConfig::new(&binary).expect("valid binary");
    let runner = ProcessTestRunner::new(HobbesAdapter, config)
        .with_timeout(std::time::Duration::from_millis(200));

    let report = runner
        .run(&temp.path().join("runs"))
        .await
        .expect("run should complete");

    assert!(report.timed_out);
    assert_eq!(report.status, RunStatus::Error);
    let error = report.error.expect("error should be set");
    assert!(error.contains("timed out"), "{error}");
}

fn runner_invocations(
    runner: &ProcessTestRunner<HobbesAdapter, ScriptedExecutor>,
) -> Vec<testbridge::Invocation> {
    runner.executor().invocations()
}
