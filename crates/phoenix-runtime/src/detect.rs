//! Accelerator detection via `nvidia-smi`.
//!
//! `nvidia-smi -x -q` prints an XML report whose `attached_gpus` element
//! holds the device count. Every failure along the way (tool missing,
//! non-zero exit, unexpected XML) is returned as a [`DetectError`]; the
//! session treats all of them as "no accelerator".

use phoenix_core::ports::{AcceleratorProbePort, AcceleratorReport, DetectError, DetectResult};
use phoenix_core::Platform;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// Default diagnostic tool name, looked up in `PATH`.
pub const NVIDIA_SMI: &str = "nvidia-smi";

/// The subset of the `nvidia-smi` XML report we care about.
#[derive(Debug, Deserialize)]
struct NvidiaSmiLog {
    attached_gpus: String,
}

/// Extract the attached device count from an `nvidia-smi -x -q` report.
pub fn parse_attached_gpus(xml: &str) -> DetectResult<u32> {
    let malformed = |reason: String| DetectError::MalformedOutput {
        tool: NVIDIA_SMI.to_string(),
        reason,
    };

    let log: NvidiaSmiLog = quick_xml::de::from_str(xml).map_err(|e| malformed(e.to_string()))?;
    log.attached_gpus
        .trim()
        .parse::<u32>()
        .map_err(|e| malformed(format!("attached_gpus '{}': {e}", log.attached_gpus.trim())))
}

/// Probe backed by the `nvidia-smi` command.
#[derive(Debug, Clone)]
pub struct NvidiaSmiProbe {
    program: PathBuf,
}

impl NvidiaSmiProbe {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(NVIDIA_SMI),
        }
    }

    /// Use a different executable, e.g. a stub in tests.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for NvidiaSmiProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl AcceleratorProbePort for NvidiaSmiProbe {
    fn probe(&self) -> DetectResult<AcceleratorReport> {
        let tool = self.program.display().to_string();
        let output = Command::new(&self.program)
            .args(["-x", "-q"])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| DetectError::ToolUnavailable {
                tool: tool.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(DetectError::ToolFailed {
                tool,
                status: output.status.to_string(),
            });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        let device_count = parse_attached_gpus(&xml)?;
        Ok(AcceleratorReport { device_count })
    }
}

/// Outcome of reconciling the requested accelerator with the platform and hardware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccelerationDecision {
    /// Whether the GPU build is selected.
    pub use_gpu: bool,
    /// Whether an accelerator was detected.
    pub has_gpu: bool,
    /// Messages to surface to the user.
    pub warnings: Vec<String>,
}

/// Decide the effective accelerator class.
///
/// Platforms without GPU builds force the CPU variant. A request for the GPU
/// on a machine where none was detected only produces a warning: the GPU
/// build is still searched for, since detection may simply be unavailable.
pub fn decide_acceleration(
    platform: &Platform,
    requested: bool,
    probe: &dyn AcceleratorProbePort,
) -> AccelerationDecision {
    let mut warnings = Vec::new();
    let mut use_gpu = requested;

    if requested && !platform.supports_accelerator() {
        use_gpu = false;
        warnings.push(format!(
            "GPU computation is not yet supported in PHOENIX for {}.",
            platform.system_name()
        ));
    }

    let has_gpu = match probe.probe() {
        Ok(report) => report.has_accelerator(),
        Err(e) => {
            debug!(error = %e, "accelerator probe failed, assuming none");
            false
        }
    };

    if use_gpu && !has_gpu {
        warnings.push(
            "GPU requested but GPU not detected, falling back to CPU simulation.".to_string(),
        );
    }

    AccelerationDecision {
        use_gpu,
        has_gpu,
        warnings,
    }
}
