//! Construction parameters for a PHOENIX session.

use std::env;
use std::path::PathBuf;

use crate::paths::phoenix_path_from_env;
use crate::platform::Platform;
use crate::variant::Precision;

/// Base URL of the PHOENIX release downloads.
pub const DEFAULT_RELEASE_BASE_URL: &str = "https://github.com/robertschade/PHOENIX/releases/download";

/// Release tag used for the download fallback.
pub const RELEASE_TAG: &str = "latest";

/// Environment variable overriding [`DEFAULT_RELEASE_BASE_URL`].
pub const RELEASE_URL_ENV: &str = "PHOENIX_RELEASE_URL";

/// Where users are pointed when something goes wrong.
pub const PROJECT_HELP: &str = "Please consult https://github.com/Schumacher-Group-UPB/PHOENIX. \
You can open an issue at https://github.com/Schumacher-Group-UPB/PHOENIX/issues/new.";

/// Everything a session needs to know at construction time.
///
/// # Example
///
/// ```
/// use phoenix_core::{Precision, SessionOptions};
///
/// let options = SessionOptions::new()
///     .precision(Precision::Fp64)
///     .use_gpu(false)
///     .result_path("results");
/// assert!(!options.use_gpu);
/// ```
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub precision: Precision,
    /// Whether the GPU build is requested.
    pub use_gpu: bool,
    /// Device index exported as `CUDA_VISIBLE_DEVICES`.
    pub gpu_id: u32,
    /// Use the SFML (live visualisation) build.
    pub sfml: bool,
    /// Directory tree to search; falls back to `PHOENIX_PATH`, then `../..`.
    pub hint_path: Option<PathBuf>,
    /// Output directory; falls back to `tmp_phoenix_results`.
    pub result_path: Option<PathBuf>,
    /// Verbose mode: show every child line and extra diagnostics.
    pub debug: bool,
    pub platform: Platform,
    pub release_base_url: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            precision: Precision::Fp32,
            use_gpu: true,
            gpu_id: 0,
            sfml: false,
            hint_path: None,
            result_path: None,
            debug: false,
            platform: Platform::current(),
            release_base_url: DEFAULT_RELEASE_BASE_URL.to_string(),
        }
    }
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with `PHOENIX_PATH` and `PHOENIX_RELEASE_URL` applied when set.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Some(path) = phoenix_path_from_env().filter(|p| !p.trim().is_empty()) {
            options.hint_path = Some(PathBuf::from(path));
        }
        if let Ok(url) = env::var(RELEASE_URL_ENV) {
            if !url.trim().is_empty() {
                options.release_base_url = url.trim().to_string();
            }
        }
        options
    }

    #[must_use]
    pub const fn precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub const fn use_gpu(mut self, use_gpu: bool) -> Self {
        self.use_gpu = use_gpu;
        self
    }

    #[must_use]
    pub const fn gpu_id(mut self, gpu_id: u32) -> Self {
        self.gpu_id = gpu_id;
        self
    }

    #[must_use]
    pub const fn sfml(mut self, sfml: bool) -> Self {
        self.sfml = sfml;
        self
    }

    #[must_use]
    pub fn hint_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.hint_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn result_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.result_path = Some(path.into());
        self
    }

    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub fn release_base_url(mut self, url: impl Into<String>) -> Self {
        self.release_base_url = url.into();
        self
    }
}
