//! PHOENIX binary resolution.
//!
//! Resolution happens in two stages:
//!
//! 1. **Local search**: every file below the search root whose name matches
//!    the variant's pattern is run with `--help`. The last candidate (in glob
//!    order) that exits successfully wins.
//! 2. **Download fallback**: the release asset for the variant and platform is
//!    fetched into the download directory, made executable and verified.
//!
//! Failures are returned as [`ResolveError`] and reported through the
//! session's [`SessionReporter`]; nothing here panics.

mod error;

pub use error::ResolveError;

use glob::{MatchOptions, Pattern};
use phoenix_core::ports::{ArtifactFetcher, NoticeLevel, SessionReporter};
use phoenix_core::{
    DEFAULT_RELEASE_BASE_URL, PROJECT_HELP, Platform, RELEASE_TAG, VariantSignature,
    ensure_directory,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::env::library_path_override;
use crate::verify::verify_binary;

/// Where the resolved binary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Found and verified below the search root.
    Local,
    /// Downloaded from the release page.
    Downloaded,
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Downloaded => write!(f, "downloaded"),
        }
    }
}

/// A verified, runnable PHOENIX binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: PathBuf,
    pub source: ResolutionSource,
}

/// Finds or downloads the PHOENIX binary for one variant.
pub struct Resolver {
    signature: VariantSignature,
    platform: Platform,
    download_dir: PathBuf,
    release_base_url: String,
    debug: bool,
    fetcher: Arc<dyn ArtifactFetcher>,
    reporter: Arc<dyn SessionReporter>,
}

impl Resolver {
    pub fn new(
        signature: VariantSignature,
        platform: Platform,
        download_dir: impl Into<PathBuf>,
        fetcher: Arc<dyn ArtifactFetcher>,
        reporter: Arc<dyn SessionReporter>,
    ) -> Self {
        Self {
            signature,
            platform,
            download_dir: download_dir.into(),
            release_base_url: DEFAULT_RELEASE_BASE_URL.to_string(),
            debug: false,
            fetcher,
            reporter,
        }
    }

    #[must_use]
    pub fn release_base_url(mut self, url: impl Into<String>) -> Self {
        self.release_base_url = url.into();
        self
    }

    /// Emit informational notices for each step.
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Report a fallback failure to the user and hand it back.
    fn fail(&self, err: ResolveError) -> ResolveError {
        self.reporter
            .notice(NoticeLevel::Error, &format!("{err}. {PROJECT_HELP}"));
        err
    }

    fn info(&self, message: &str) {
        debug!("{message}");
        if self.debug {
            self.reporter.notice(NoticeLevel::Info, message);
        }
    }

    /// Recursive glob below `root`. Special characters in `root` are escaped.
    pub fn search_glob(&self, root: &Path) -> String {
        let escaped_root = Pattern::escape(&root.to_string_lossy());
        format!(
            "{}/**/{}",
            escaped_root.trim_end_matches(['/', '\\']),
            self.signature.search_pattern(&self.platform)
        )
    }

    /// Regular files below `root` matching the variant, in glob order.
    pub fn find_candidates(&self, root: &Path) -> Vec<PathBuf> {
        let pattern = self.search_glob(root);
        debug!(%pattern, "searching for PHOENIX binaries");

        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };

        match glob::glob_with(&pattern, options) {
            Ok(paths) => paths
                .filter_map(|entry| match entry {
                    Ok(path) => Some(path),
                    Err(e) => {
                        debug!(error = %e, "skipping unreadable path");
                        None
                    }
                })
                .filter(|path| path.is_file())
                .collect(),
            Err(e) => {
                warn!(%pattern, error = %e, "invalid search pattern");
                Vec::new()
            }
        }
    }

    /// Verify every local candidate; the last one that runs wins.
    pub async fn resolve_local(&self, root: &Path) -> Option<PathBuf> {
        let mut selected = None;

        for candidate in self.find_candidates(root) {
            self.info(&format!("Trying PHOENIX candidate {}", candidate.display()));

            let dir = candidate.parent().unwrap_or_else(|| Path::new("."));
            let overrides = vec![library_path_override(&self.platform, dir)];

            match verify_binary(&candidate, &overrides).await {
                Ok(()) => {
                    self.info(&format!("Found usable PHOENIX binary at {}", candidate.display()));
                    selected = Some(candidate);
                }
                Err(e) => debug!(error = %e, "candidate not usable"),
            }
        }

        selected
    }

    /// Release asset name, e.g. `PHOENIX_gpu_fp32_Linux_x86_64`.
    pub fn release_filename(&self) -> String {
        self.signature.release_filename(&self.platform)
    }

    pub fn release_url(&self) -> String {
        format!(
            "{}/{RELEASE_TAG}/{}",
            self.release_base_url.trim_end_matches('/'),
            self.release_filename()
        )
    }

    /// Download the release asset, make it executable and verify it.
    pub async fn download_fallback(&self) -> Result<PathBuf, ResolveError> {
        let filename = self.release_filename();
        let url = self.release_url();
        let dest = self.download_dir.join(&filename);

        self.reporter.notice(
            NoticeLevel::Warning,
            &format!("No usable PHOENIX binary found locally, downloading {filename} from {url}"),
        );

        ensure_directory(&self.download_dir).map_err(|e| self.fail(e.into()))?;

        if let Err(source) = self.fetcher.fetch(&url, &dest).await {
            return Err(self.fail(ResolveError::DownloadFailed { url, source }));
        }

        mark_owner_executable(&dest)
            .await
            .map_err(|e| self.fail(e))?;

        if let Err(source) = verify_binary(&dest, &Vec::new()).await {
            let err = ResolveError::DownloadedBinaryBroken {
                path: dest,
                source,
            };
            self.reporter.notice(
                NoticeLevel::Error,
                &format!(
                    "{err}. The release build may not support this machine; \
                     try building PHOENIX from source. {PROJECT_HELP}"
                ),
            );
            return Err(err);
        }

        self.info(&format!("Downloaded PHOENIX binary to {}", dest.display()));
        Ok(dest)
    }

    /// Local search first, download second.
    pub async fn resolve(&self, root: &Path) -> Result<Resolution, ResolveError> {
        if let Some(path) = self.resolve_local(root).await {
            return Ok(Resolution {
                path,
                source: ResolutionSource::Local,
            });
        }

        let path = self.download_fallback().await?;
        Ok(Resolution {
            path,
            source: ResolutionSource::Downloaded,
        })
    }
}

#[cfg(unix)]
async fn mark_owner_executable(path: &Path) -> Result<(), ResolveError> {
    use std::os::unix::fs::PermissionsExt;

    let to_error = |e: std::io::Error| ResolveError::Permissions {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut permissions = tokio::fs::metadata(path)
        .await
        .map_err(to_error)?
        .permissions();
    permissions.set_mode(permissions.mode() | 0o100);
    tokio::fs::set_permissions(path, permissions)
        .await
        .map_err(to_error)
}

#[cfg(not(unix))]
async fn mark_owner_executable(_path: &Path) -> Result<(), ResolveError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use phoenix_core::ports::DownloadError;
    use phoenix_core::{Acceleration, NoopReporter, Precision};

    struct RefusingFetcher;

    #[async_trait]
    impl ArtifactFetcher for RefusingFetcher {
        async fn fetch(&self, url: &str, _dest: &Path) -> Result<(), DownloadError> {
            Err(DownloadError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    #[derive(Default)]
    struct ErrorCounter {
        errors: std::sync::atomic::AtomicUsize,
    }

    impl SessionReporter for ErrorCounter {
        fn notice(&self, level: NoticeLevel, _message: &str) {
            if level == NoticeLevel::Error {
                self.errors.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            }
        }
        fn line(&self, _line: &str) {}
        fn progress_block(&self, _lines: &[String]) {}
    }

    fn resolver(platform: Platform, sfml: bool) -> Resolver {
        Resolver::new(
            VariantSignature::new(Acceleration::Gpu, Precision::Fp32, sfml),
            platform,
            "/tmp/results",
            Arc::new(RefusingFetcher),
            Arc::new(NoopReporter),
        )
    }

    #[test]
    fn search_glob_is_recursive_and_escaped() {
        let r = resolver(Platform::new("linux", "x86_64"), false);
        assert_eq!(
            r.search_glob(Path::new("/home/u/[runs]/")),
            "/home/u/[[]runs[]]/**/PHOENIX_gpu_fp32*"
        );
    }

    #[test]
    fn sfml_glob_has_no_wildcard() {
        let r = resolver(Platform::new("windows", "x86_64"), true);
        assert!(r.search_glob(Path::new("C:/phoenix")).ends_with("/**/PHOENIX_gpu_fp32_sfml.exe"));
    }

    #[test]
    fn release_url_uses_latest_tag() {
        let r = resolver(Platform::new("macos", "aarch64"), false)
            .release_base_url("https://mirror.example/dl/");
        assert_eq!(
            r.release_url(),
            "https://mirror.example/dl/latest/PHOENIX_gpu_fp32_Darwin_arm64"
        );
    }

    #[test]
    fn missing_root_yields_no_candidates() {
        let r = resolver(Platform::new("linux", "x86_64"), false);
        assert!(r.find_candidates(Path::new("/nonexistent/phoenix/tree")).is_empty());
    }

    #[tokio::test]
    async fn unusable_download_dir_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let occupied = dir.path().join("results");
        std::fs::write(&occupied, "not a directory").unwrap();

        let reporter = Arc::new(ErrorCounter::default());
        let r = Resolver::new(
            VariantSignature::new(Acceleration::Cpu, Precision::Fp32, false),
            Platform::new("linux", "x86_64"),
            &occupied,
            Arc::new(RefusingFetcher),
            reporter.clone(),
        );

        let err = r.download_fallback().await.unwrap_err();
        assert!(matches!(err, ResolveError::ResultDir(_)));
        assert_eq!(reporter.errors.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_download_is_reported_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let r = Resolver::new(
            VariantSignature::new(Acceleration::Cpu, Precision::Fp64, false),
            Platform::new("linux", "x86_64"),
            dir.path().join("results"),
            Arc::new(RefusingFetcher),
            Arc::new(NoopReporter),
        );

        let err = r.resolve(&dir.path().join("empty")).await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::DownloadFailed {
                source: DownloadError::Status { status: 404, .. },
                ..
            }
        ));
        assert!(dir.path().join("results").is_dir());
    }
}
