//! Shared fixtures for session tests: fake PHOENIX executables, a fixed
//! accelerator probe, a mocked fetcher and a reporter that records output.

#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use phoenix_core::ports::{
    AcceleratorProbePort, AcceleratorReport, ArtifactFetcher, DetectError, DetectResult,
    DownloadError, NoticeLevel, SessionReporter,
};
use phoenix_core::{Platform, SessionOptions};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

mock! {
    pub Fetcher {}

    #[async_trait]
    impl ArtifactFetcher for Fetcher {
        async fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
    }
}

/// Fetcher that must never be called.
pub fn no_download() -> MockFetcher {
    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch().never();
    fetcher
}

/// Fetcher that fails exactly once with HTTP 404.
pub fn failing_download_once() -> MockFetcher {
    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch().times(1).returning(|url, _| {
        Err(DownloadError::Status {
            url: url.to_string(),
            status: 404,
        })
    });
    fetcher
}

/// `None` simulates a missing `nvidia-smi`.
pub struct FixedProbe(pub Option<u32>);

impl AcceleratorProbePort for FixedProbe {
    fn probe(&self) -> DetectResult<AcceleratorReport> {
        match self.0 {
            Some(device_count) => Ok(AcceleratorReport { device_count }),
            None => Err(DetectError::ToolUnavailable {
                tool: "nvidia-smi".to_string(),
                reason: "not found".to_string(),
            }),
        }
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub notices: Mutex<Vec<(NoticeLevel, String)>>,
    pub lines: Mutex<Vec<String>>,
    pub blocks: Mutex<Vec<Vec<String>>>,
}

impl RecordingReporter {
    pub fn notices_at(&self, level: NoticeLevel) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl SessionReporter for RecordingReporter {
    fn notice(&self, level: NoticeLevel, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }

    fn line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }

    fn progress_block(&self, lines: &[String]) {
        self.blocks.lock().unwrap().push(lines.to_vec());
    }
}

/// Write an executable `#!/bin/sh` script at `dir/name`.
pub fn fake_binary(dir: &Path, name: &str, body: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Script body that passes `--help` and otherwise runs `run_body`.
pub fn help_ok_then(run_body: &str) -> String {
    format!("if [ \"$1\" = \"--help\" ]; then exit 0; fi\n{run_body}")
}

/// Linux/x86_64 CPU session rooted in `tree`, writing to `results`.
pub fn cpu_options(tree: &Path, results: &Path) -> SessionOptions {
    SessionOptions::new()
        .use_gpu(false)
        .hint_path(tree)
        .result_path(results)
        .platform(Platform::new("linux", "x86_64"))
        .release_base_url("https://releases.invalid/PHOENIX")
}
