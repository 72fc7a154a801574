//! HTTP release download.
//!
//! The body is streamed to `<dest>.part` and renamed into place once complete,
//! so an interrupted transfer never leaves a truncated binary at `dest`. The
//! `.part` file is removed on any failure after it was created.

use async_trait::async_trait;
use futures_util::StreamExt;
#[cfg(feature = "cli")]
use indicatif::{ProgressBar, ProgressStyle};
use phoenix_core::ports::{ArtifactFetcher, DownloadError};
use reqwest::Client;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::debug;

const USER_AGENT: &str = concat!("phoenix-launcher/", env!("CARGO_PKG_VERSION"));

/// [`ArtifactFetcher`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    #[cfg_attr(not(feature = "cli"), allow(dead_code))]
    show_progress: bool,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            show_progress: false,
        }
    }

    /// Show a terminal progress bar (only with the `cli` feature).
    #[must_use]
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

#[cfg(feature = "cli")]
fn progress_bar(total_size: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb
}

#[async_trait]
impl ArtifactFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        let transport = |e: reqwest::Error| DownloadError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        };
        let write = |path: &Path, e: std::io::Error| DownloadError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        debug!(%url, dest = %dest.display(), "starting download");

        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let total_size = response.content_length().unwrap_or(0);

        #[cfg(feature = "cli")]
        let pb = self.show_progress.then(|| progress_bar(total_size));

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| write(parent, e))?;
        }

        let part = part_path(dest);
        let written = async {
            let mut file = File::create(&part).await.map_err(|e| write(&part, e))?;

            let mut downloaded: u64 = 0;
            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(transport)?;
                file.write_all(&chunk).await.map_err(|e| write(&part, e))?;
                downloaded += chunk.len() as u64;

                #[cfg(feature = "cli")]
                if let Some(ref pb) = pb {
                    pb.set_position(downloaded);
                }
            }

            file.flush().await.map_err(|e| write(&part, e))?;
            drop(file);

            fs::rename(&part, dest).await.map_err(|e| write(dest, e))?;
            Ok::<_, DownloadError>(downloaded)
        }
        .await;

        let downloaded = match written {
            Ok(downloaded) => downloaded,
            Err(e) => {
                let _ = fs::remove_file(&part).await;
                return Err(e);
            }
        };

        #[cfg(feature = "cli")]
        if let Some(pb) = pb {
            pb.finish_with_message("Download complete");
        }

        debug!(bytes = downloaded, expected = total_size, "download finished");
        Ok(())
    }
}
