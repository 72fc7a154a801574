//! Accelerator probe port.
//!
//! # Design Notes
//!
//! - Core owns the trait and types (pure)
//! - Runtime owns the implementation (runs `nvidia-smi`)
//! - Callers treat every `DetectError` as "no accelerator"

use thiserror::Error;

/// Errors that can occur while probing for accelerators.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The diagnostic tool could not be started.
    #[error("failed to run {tool}: {reason}")]
    ToolUnavailable { tool: String, reason: String },

    /// The diagnostic tool exited unsuccessfully.
    #[error("{tool} exited with status {status}")]
    ToolFailed { tool: String, status: String },

    /// The tool's output could not be interpreted.
    #[error("failed to parse {tool} output: {reason}")]
    MalformedOutput { tool: String, reason: String },
}

pub type DetectResult<T> = Result<T, DetectError>;

/// What the probe found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AcceleratorReport {
    /// Number of attached accelerator devices.
    pub device_count: u32,
}

impl AcceleratorReport {
    pub const fn has_accelerator(&self) -> bool {
        self.device_count > 0
    }
}

/// Port for querying attached accelerator hardware.
pub trait AcceleratorProbePort: Send + Sync {
    /// Count attached accelerator devices.
    fn probe(&self) -> DetectResult<AcceleratorReport>;

    /// Convenience wrapper that folds every failure into "not available".
    fn has_accelerator(&self) -> bool {
        self.probe().is_ok_and(|report| report.has_accelerator())
    }
}
