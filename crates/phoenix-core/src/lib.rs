//! Core domain types and port definitions for the PHOENIX launcher.
//!
//! This crate is pure: it describes which PHOENIX build a session wants
//! ([`VariantSignature`]), how it is configured ([`SessionOptions`],
//! [`RunConfig`]), and the traits through which the runtime talks to the
//! outside world ([`ports`]). It never spawns processes or touches the network.
#![deny(unused_crate_dependencies)]

pub mod options;
pub mod paths;
pub mod platform;
pub mod ports;
pub mod run_config;
pub mod variant;

pub use options::{
    DEFAULT_RELEASE_BASE_URL, PROJECT_HELP, RELEASE_TAG, RELEASE_URL_ENV, SessionOptions,
};
pub use paths::{
    DEFAULT_RESULT_DIR_RELATIVE, DEFAULT_SEARCH_ROOT_RELATIVE, PHOENIX_PATH_ENV, PathError,
    SearchRootResolution, SearchRootSource, absolutize, ensure_directory, phoenix_path_from_env,
    resolve_result_dir, resolve_search_root,
};
pub use platform::{OsFamily, Platform};
pub use ports::{
    AcceleratorProbePort, AcceleratorReport, ArtifactFetcher, DetectError, DetectResult,
    DownloadError, NoopReporter, NoticeLevel, SessionReporter,
};
pub use run_config::{FlagValue, RunConfig, RunConfigError};
pub use variant::{Acceleration, PROGRAM_NAME, ParsePrecisionError, Precision, VariantSignature};
