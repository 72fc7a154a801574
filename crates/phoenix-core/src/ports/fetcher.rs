//! Artifact download port.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while fetching a release artifact.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Writing the artifact to disk failed.
    #[error("failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

/// Port for downloading a single file.
///
/// Implementations make exactly one attempt; retry policy is out of scope.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Download `url` into `dest`, replacing any existing file.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
}
