//! Variant signature of a PHOENIX build.
//!
//! PHOENIX is shipped as separate executables per accelerator class, numeric
//! precision and UI toolkit. The combination selects a file name of the form
//! `PHOENIX_<accel>_<precision>[_sfml]`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::platform::Platform;

/// Base name shared by every PHOENIX executable.
pub const PROGRAM_NAME: &str = "PHOENIX";

/// Accelerator class of a PHOENIX build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acceleration {
    /// CUDA build
    Gpu,
    /// CPU only
    Cpu,
}

impl Acceleration {
    pub const fn from_gpu_flag(use_gpu: bool) -> Self {
        if use_gpu { Self::Gpu } else { Self::Cpu }
    }

    /// File name suffix for this accelerator class
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Gpu => "_gpu",
            Self::Cpu => "_cpu",
        }
    }

    /// Get the display name for this acceleration type
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Gpu => "GPU",
            Self::Cpu => "CPU",
        }
    }
}

impl fmt::Display for Acceleration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Floating point precision of a PHOENIX build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    #[default]
    Fp32,
    Fp64,
}

impl Precision {
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Fp32 => "_fp32",
            Self::Fp64 => "_fp64",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fp32 => "fp32",
            Self::Fp64 => "fp64",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown precision name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown precision '{0}', expected 'fp32' or 'fp64'")]
pub struct ParsePrecisionError(pub String);

impl FromStr for Precision {
    type Err = ParsePrecisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fp32" | "single" => Ok(Self::Fp32),
            "fp64" | "double" => Ok(Self::Fp64),
            _ => Err(ParsePrecisionError(s.to_string())),
        }
    }
}

/// The combination of accelerator class, precision and UI toolkit flag that
/// selects one PHOENIX executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantSignature {
    pub acceleration: Acceleration,
    pub precision: Precision,
    pub sfml: bool,
}

impl VariantSignature {
    pub const fn new(acceleration: Acceleration, precision: Precision, sfml: bool) -> Self {
        Self {
            acceleration,
            precision,
            sfml,
        }
    }

    /// Fixed part of the file name, e.g. `PHOENIX_gpu_fp64_sfml`.
    pub fn stem(&self) -> String {
        let mut name = format!(
            "{PROGRAM_NAME}{}{}",
            self.acceleration.suffix(),
            self.precision.suffix()
        );
        if self.sfml {
            name.push_str("_sfml");
        }
        name
    }

    /// File name glob used when searching the local tree.
    ///
    /// Without SFML any trailing suffix is accepted, so `PHOENIX_cpu_fp32*`
    /// also matches SFML builds and locally renamed copies.
    pub fn search_pattern(&self, platform: &Platform) -> String {
        let mut pattern = self.stem();
        if !self.sfml {
            pattern.push('*');
        }
        pattern.push_str(platform.exe_suffix());
        pattern
    }

    /// Concrete release asset name for `platform`, e.g.
    /// `PHOENIX_cpu_fp32_Linux_x86_64`.
    pub fn release_filename(&self, platform: &Platform) -> String {
        format!(
            "{}_{}_{}{}",
            self.stem(),
            platform.system_name(),
            platform.machine_name(),
            platform.exe_suffix()
        )
    }
}

impl fmt::Display for VariantSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}{}",
            self.acceleration,
            self.precision,
            if self.sfml { "/sfml" } else { "" }
        )
    }
}
