//! Runnability check for PHOENIX candidates.
//!
//! A candidate counts as usable when `<binary> --help` exits with status 0.
//! This catches wrong architectures and missing shared libraries, which a
//! plain existence check would not.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::env::EnvOverrides;

/// No-op flag every PHOENIX build accepts.
pub const HELP_FLAG: &str = "--help";

/// Why a candidate was rejected.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The process could not be started at all.
    #[error("failed to execute {path}: {reason}")]
    Spawn { path: PathBuf, reason: String },

    /// The process ran but reported failure.
    #[error("{path} --help exited with {status}")]
    ExitStatus { path: PathBuf, status: String },
}

/// Run `path --help` with `overrides` applied and check the exit status.
pub async fn verify_binary(path: &Path, overrides: &EnvOverrides) -> Result<(), VerifyError> {
    debug!(path = %path.display(), "verifying candidate");

    let output = Command::new(path)
        .arg(HELP_FLAG)
        .envs(overrides.iter().map(|(k, v)| (k, v)))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| VerifyError::Spawn {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if output.status.success() {
        Ok(())
    } else {
        debug!(
            path = %path.display(),
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "candidate rejected"
        );
        Err(VerifyError::ExitStatus {
            path: path.to_path_buf(),
            status: output.status.to_string(),
        })
    }
}
