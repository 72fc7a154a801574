//! Child process environment.
//!
//! PHOENIX builds ship their shared libraries next to the executable, so the
//! containing directory is prepended to the loader search variable. Each
//! invocation computes its own overrides; nothing is written back to this
//! process's environment.

use phoenix_core::Platform;
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Variable restricting which CUDA devices the child may use.
pub const CUDA_VISIBLE_DEVICES: &str = "CUDA_VISIBLE_DEVICES";

/// Environment overrides applied on top of the inherited environment.
pub type EnvOverrides = Vec<(OsString, OsString)>;

/// Prepend `dir` to a path-list value. An absent or empty value yields `dir` alone.
pub fn prepend_search_path(platform: &Platform, existing: Option<&OsStr>, dir: &Path) -> OsString {
    let mut value = OsString::from(dir.as_os_str());
    if let Some(existing) = existing.filter(|v| !v.is_empty()) {
        value.push(platform.path_list_separator().to_string());
        value.push(existing);
    }
    value
}

/// Loader search path override for a binary living in `binary_dir`,
/// based on the current process environment.
pub fn library_path_override(platform: &Platform, binary_dir: &Path) -> (OsString, OsString) {
    let var = platform.library_path_var();
    let existing = std::env::var_os(var);
    (
        OsString::from(var),
        prepend_search_path(platform, existing.as_deref(), binary_dir),
    )
}

/// Overrides for a simulation run: library path plus the visible device index.
///
/// The device index is exported even for CPU builds.
pub fn run_overrides(platform: &Platform, binary_dir: &Path, gpu_id: u32) -> EnvOverrides {
    vec![
        library_path_override(platform, binary_dir),
        (
            OsString::from(CUDA_VISIBLE_DEVICES),
            OsString::from(gpu_id.to_string()),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_directory_to_existing_value() {
        let linux = Platform::new("linux", "x86_64");
        let value = prepend_search_path(
            &linux,
            Some(OsStr::new("/usr/lib:/opt/lib")),
            Path::new("/phoenix/bin"),
        );
        assert_eq!(value, OsString::from("/phoenix/bin:/usr/lib:/opt/lib"));
    }

    #[test]
    fn absent_or_empty_value_yields_directory_only() {
        let linux = Platform::new("linux", "x86_64");
        let dir = Path::new("/phoenix/bin");
        assert_eq!(prepend_search_path(&linux, None, dir), OsString::from("/phoenix/bin"));
        assert_eq!(
            prepend_search_path(&linux, Some(OsStr::new("")), dir),
            OsString::from("/phoenix/bin")
        );
    }

    #[test]
    fn windows_uses_semicolon() {
        let windows = Platform::new("windows", "x86_64");
        let value = prepend_search_path(&windows, Some(OsStr::new("C:\\a")), Path::new("C:\\b"));
        assert_eq!(value, OsString::from("C:\\b;C:\\a"));
    }

    #[test]
    fn run_overrides_always_set_visible_devices() {
        let linux = Platform::new("linux", "x86_64");
        let overrides = run_overrides(&linux, Path::new("/phoenix/bin"), 3);

        assert_eq!(overrides[0].0, OsString::from("LD_LIBRARY_PATH"));
        assert!(
            overrides[0]
                .1
                .to_string_lossy()
                .starts_with("/phoenix/bin")
        );
        assert_eq!(
            overrides[1],
            (OsString::from(CUDA_VISIBLE_DEVICES), OsString::from("3"))
        );
    }
}
