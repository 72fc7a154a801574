//! Simulation runs: argument expansion, environment, output filtering and
//! failure reporting.
#![cfg(unix)]

mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use common::{
    FixedProbe, RecordingReporter, cpu_options, failing_download_once, fake_binary,
    help_ok_then, no_download,
};
use phoenix_core::RunConfig;
use phoenix_core::ports::NoticeLevel;
use phoenix_runtime::{RunOutcome, Session};
use tempfile::tempdir;

async fn open_with(
    tree: &Path,
    results: &Path,
    debug: bool,
    reporter: Arc<RecordingReporter>,
) -> Session {
    Session::builder(cpu_options(tree, results).debug(debug).gpu_id(2))
        .probe(Arc::new(FixedProbe(Some(0))))
        .fetcher(Arc::new(no_download()))
        .reporter(reporter)
        .open()
        .await
}

#[tokio::test]
async fn run_without_binary_spawns_nothing() {
    let dir = tempdir().unwrap();
    let tree = dir.path().join("tree");
    fs::create_dir_all(&tree).unwrap();
    let results = dir.path().join("results");

    let reporter = Arc::new(RecordingReporter::default());
    let session = Session::builder(cpu_options(&tree, &results))
        .probe(Arc::new(FixedProbe(None)))
        .fetcher(Arc::new(failing_download_once()))
        .reporter(reporter.clone())
        .open()
        .await;

    let outcome = session.run(&RunConfig::new().with("tmax", 100)).await;

    assert_eq!(outcome, RunOutcome::Unavailable);
    assert!(
        reporter
            .notices_at(NoticeLevel::Error)
            .iter()
            .any(|e| e.starts_with("PHOENIX binary is missing"))
    );
    assert!(reporter.blocks.lock().unwrap().is_empty());
}

#[tokio::test]
async fn flags_and_environment_reach_the_binary() {
    let dir = tempdir().unwrap();
    let tree = dir.path().join("tree");
    let bin_dir = tree.join("bin");
    let results = dir.path().join("results");
    let record = dir.path().join("record.txt");

    fake_binary(
        &bin_dir,
        "PHOENIX_cpu_fp32",
        &help_ok_then(&format!(
            "printf '%s\\n' \"$@\" > '{out}'\n\
             echo \"CUDA=$CUDA_VISIBLE_DEVICES\" >> '{out}'\n\
             echo \"LIB=$LD_LIBRARY_PATH\" >> '{out}'",
            out = record.display()
        )),
    );

    let session = open_with(&tree, &results, false, Arc::default()).await;
    let config = RunConfig::new()
        .with("tmax", 500)
        .with("N", vec![256, 128])
        .with("gammaC", 0.15);

    let outcome = session.run(&config).await;
    assert_eq!(outcome, RunOutcome::Completed);

    let recorded = fs::read_to_string(&record).unwrap();
    let lines: Vec<&str> = recorded.lines().collect();
    let result_dir = session.result_path().display().to_string();
    assert_eq!(
        &lines[..11],
        &[
            "--tmax", "500", "--N", "256", "128", "--gammaC", "0.15", "--path",
            result_dir.as_str(), "--path", ".",
        ]
    );
    assert_eq!(lines[11], "-nosfml");
    assert_eq!(lines[12], "CUDA=2");
    assert!(lines[13].starts_with(&format!("LIB={}", bin_dir.display())));
    assert!(results.is_dir());
}

#[tokio::test]
async fn quiet_mode_shows_only_completed_progress_blocks() {
    let dir = tempdir().unwrap();
    let tree = dir.path().join("tree");
    fake_binary(
        &tree,
        "PHOENIX_cpu_fp32",
        &help_ok_then(
            "echo 'Reading initial condition'\n\
             echo 'T = 10 ps'\n\
             echo 'Progress: 10%'\n\
             echo 'Time per ps: 0.5s'\n\
             echo 'unrelated'\n\
             echo 'T = 20 ps'\n\
             echo 'Runtime: 12s'",
        ),
    );

    let reporter = Arc::new(RecordingReporter::default());
    let session = open_with(&tree, &dir.path().join("results"), false, reporter.clone()).await;

    assert_eq!(session.run(&RunConfig::new()).await, RunOutcome::Completed);

    let blocks = reporter.blocks.lock().unwrap();
    assert_eq!(
        *blocks,
        vec![vec![
            "T = 10 ps".to_string(),
            "Progress: 10%".to_string(),
            "Time per ps: 0.5s".to_string(),
        ]]
    );
    assert!(reporter.lines.lock().unwrap().is_empty());
}

#[tokio::test]
async fn debug_mode_passes_every_line_through() {
    let dir = tempdir().unwrap();
    let tree = dir.path().join("tree");
    fake_binary(
        &tree,
        "PHOENIX_cpu_fp32",
        &help_ok_then("echo 'Reading initial condition'\necho 'T = 10 ps'"),
    );

    let reporter = Arc::new(RecordingReporter::default());
    let session = open_with(&tree, &dir.path().join("results"), true, reporter.clone()).await;

    assert_eq!(session.run(&RunConfig::new()).await, RunOutcome::Completed);

    assert_eq!(
        *reporter.lines.lock().unwrap(),
        vec!["Reading initial condition", "T = 10 ps"]
    );
    assert!(reporter.blocks.lock().unwrap().is_empty());
    assert!(
        reporter
            .notices_at(NoticeLevel::Info)
            .iter()
            .any(|n| n.starts_with("Running: ") && n.contains("-nosfml"))
    );
}

#[tokio::test]
async fn non_zero_exit_surfaces_stderr() {
    let dir = tempdir().unwrap();
    let tree = dir.path().join("tree");
    fake_binary(
        &tree,
        "PHOENIX_cpu_fp32",
        &help_ok_then("echo 'CUDA error: out of memory' >&2\nexit 3"),
    );

    let reporter = Arc::new(RecordingReporter::default());
    let session = open_with(&tree, &dir.path().join("results"), false, reporter.clone()).await;

    let outcome = session.run(&RunConfig::new().with("tmax", 1)).await;

    assert_eq!(
        outcome,
        RunOutcome::Failed {
            code: Some(3),
            stderr: "CUDA error: out of memory\n".to_string(),
        }
    );
    let errors = reporter.notices_at(NoticeLevel::Error);
    assert!(errors[0].starts_with("Something went wrong."));
    assert_eq!(errors[1], "Please check the error output:");
    assert_eq!(errors[2], "CUDA error: out of memory\n");
}

#[tokio::test]
async fn sessions_can_run_repeatedly() {
    let dir = tempdir().unwrap();
    let tree = dir.path().join("tree");
    fake_binary(&tree, "PHOENIX_cpu_fp32", &help_ok_then("exit 0"));

    let session = open_with(&tree, &dir.path().join("results"), false, Arc::default()).await;

    for tmax in [10, 20] {
        let outcome = session.run(&RunConfig::new().with("tmax", tmax)).await;
        assert!(outcome.is_success());
    }
}
