//! Port definitions (trait abstractions) for external collaborators.
//!
//! Core owns the traits and their error types; `phoenix-runtime` provides the
//! implementations that run commands, talk to the network, or write to the
//! terminal. Tests substitute their own.

mod accelerator;
mod fetcher;
mod reporter;

pub use accelerator::{AcceleratorProbePort, AcceleratorReport, DetectError, DetectResult};
pub use fetcher::{ArtifactFetcher, DownloadError};
pub use reporter::{NoopReporter, NoticeLevel, SessionReporter};
