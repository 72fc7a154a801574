//! Error types for binary resolution.

use std::path::PathBuf;
use thiserror::Error;

use phoenix_core::{DownloadError, PathError};

use crate::verify::VerifyError;

/// Why no runnable PHOENIX binary could be obtained.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The release artifact could not be downloaded.
    #[error("Could not download PHOENIX from {url}: {source}")]
    DownloadFailed {
        url: String,
        #[source]
        source: DownloadError,
    },

    /// The downloaded artifact does not run on this machine.
    #[error("Downloaded PHOENIX binary at {path} is not runnable: {source}")]
    DownloadedBinaryBroken {
        path: PathBuf,
        #[source]
        source: VerifyError,
    },

    /// The directory receiving the download could not be prepared.
    #[error("Download directory error: {0}")]
    ResultDir(#[from] PathError),

    /// The execute bit could not be set on the downloaded file.
    #[error("Failed to mark {path} as executable: {reason}")]
    Permissions { path: PathBuf, reason: String },
}
