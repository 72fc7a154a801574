//! Host platform description.
//!
//! Release artifacts and executable lookup depend on the operating system and
//! machine architecture. `Platform` carries both so that resolution rules can be
//! exercised for any target, not just the host that runs the tests.

use std::fmt;

/// Operating system family as far as binary naming is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsFamily {
    Linux,
    MacOs,
    Windows,
    /// Anything else, keeping the raw `std::env::consts::OS` value.
    Other(String),
}

impl OsFamily {
    /// Map a `std::env::consts::OS` style identifier to a family.
    pub fn from_os_str(os: &str) -> Self {
        match os {
            "linux" => Self::Linux,
            "macos" => Self::MacOs,
            "windows" => Self::Windows,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Operating system and machine architecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: OsFamily,
    /// Architecture in `std::env::consts::ARCH` form (e.g. `x86_64`, `aarch64`).
    pub arch: String,
}

impl Platform {
    pub fn new(os: &str, arch: impl Into<String>) -> Self {
        Self {
            os: OsFamily::from_os_str(os),
            arch: arch.into(),
        }
    }

    /// The platform this process is running on.
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// System name as used in release asset names (`Linux`, `Darwin`, `Windows`).
    pub fn system_name(&self) -> String {
        match &self.os {
            OsFamily::Linux => "Linux".to_string(),
            OsFamily::MacOs => "Darwin".to_string(),
            OsFamily::Windows => "Windows".to_string(),
            OsFamily::Other(name) => capitalize(name),
        }
    }

    /// Machine name as used in release asset names.
    ///
    /// macOS reports Apple Silicon as `arm64` and Windows reports x86-64 as
    /// `AMD64`; everything else keeps the Rust architecture name.
    pub fn machine_name(&self) -> String {
        match (&self.os, self.arch.as_str()) {
            (OsFamily::MacOs, "aarch64") => "arm64".to_string(),
            (OsFamily::Windows, "x86_64") => "AMD64".to_string(),
            (OsFamily::Windows, "aarch64") => "ARM64".to_string(),
            (_, arch) => arch.to_string(),
        }
    }

    /// Executable file extension including the dot, empty where none is used.
    pub const fn exe_suffix(&self) -> &'static str {
        match self.os {
            OsFamily::Windows => ".exe",
            _ => "",
        }
    }

    /// Whether PHOENIX ships GPU builds for this platform.
    pub const fn supports_accelerator(&self) -> bool {
        !matches!(self.os, OsFamily::MacOs)
    }

    /// Environment variable the dynamic loader searches for shared libraries.
    pub const fn library_path_var(&self) -> &'static str {
        match self.os {
            OsFamily::MacOs => "DYLD_LIBRARY_PATH",
            OsFamily::Windows => "PATH",
            _ => "LD_LIBRARY_PATH",
        }
    }

    /// Separator between entries of a path list variable.
    pub const fn path_list_separator(&self) -> char {
        match self.os {
            OsFamily::Windows => ';',
            _ => ':',
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.system_name(), self.machine_name())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
