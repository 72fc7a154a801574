//! Path resolution for the search root and the result directory.
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No terminal I/O; callers decide how to report failures

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the directory tree that contains PHOENIX builds.
pub const PHOENIX_PATH_ENV: &str = "PHOENIX_PATH";

/// Search root used when neither a hint nor `PHOENIX_PATH` is given.
pub const DEFAULT_SEARCH_ROOT_RELATIVE: &str = "../..";

/// Result directory used when none is configured.
pub const DEFAULT_RESULT_DIR_RELATIVE: &str = "tmp_phoenix_results";

/// Errors that can occur during path resolution and directory operations.
#[derive(Debug, Error)]
pub enum PathError {
    /// A path was expected to be a directory but was not.
    #[error("{0} exists but is not a directory")]
    NotADirectory(PathBuf),

    /// Failed to create a directory.
    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,

    /// Failed to get the current working directory.
    #[error("Cannot determine current directory: {0}")]
    CurrentDirError(String),
}

/// How the search root was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchRootSource {
    /// The caller passed an explicit hint.
    Explicit,
    /// Taken from `PHOENIX_PATH`.
    EnvVar,
    /// Fallback default (`../..`).
    Default,
}

/// Resolution result for the search root.
#[derive(Debug, Clone)]
pub struct SearchRootResolution {
    /// Absolute path of the directory tree to search.
    pub path: PathBuf,
    /// How the path was determined.
    pub source: SearchRootSource,
}

/// Make `path` absolute relative to the current directory.
///
/// The path is not required to exist and is not canonicalized, so symlinks
/// and `..` components are kept as written.
pub fn absolutize(path: &Path) -> Result<PathBuf, PathError> {
    if path.as_os_str().is_empty() {
        return Err(PathError::EmptyPath);
    }
    std::path::absolute(path).map_err(|e| PathError::CurrentDirError(e.to_string()))
}

/// Resolve the search root from an explicit hint, the environment value, or the default.
///
/// Resolution order:
/// 1. Explicit hint provided by caller (highest priority)
/// 2. `env_value` (the contents of `PHOENIX_PATH`, when set and non-empty)
/// 3. `../..` relative to the current directory
pub fn resolve_search_root(
    explicit: Option<&Path>,
    env_value: Option<&str>,
) -> Result<SearchRootResolution, PathError> {
    if let Some(path) = explicit {
        return Ok(SearchRootResolution {
            path: absolutize(path)?,
            source: SearchRootSource::Explicit,
        });
    }

    if let Some(env_path) = env_value.filter(|v| !v.trim().is_empty()) {
        return Ok(SearchRootResolution {
            path: absolutize(Path::new(env_path))?,
            source: SearchRootSource::EnvVar,
        });
    }

    Ok(SearchRootResolution {
        path: absolutize(Path::new(DEFAULT_SEARCH_ROOT_RELATIVE))?,
        source: SearchRootSource::Default,
    })
}

/// Read `PHOENIX_PATH` from the process environment.
pub fn phoenix_path_from_env() -> Option<String> {
    env::var(PHOENIX_PATH_ENV).ok()
}

/// Resolve the result directory, defaulting to `tmp_phoenix_results`.
pub fn resolve_result_dir(explicit: Option<&Path>) -> Result<PathBuf, PathError> {
    absolutize(explicit.unwrap_or_else(|| Path::new(DEFAULT_RESULT_DIR_RELATIVE)))
}

/// Create `path` and its parents if missing. Succeeds when it already exists.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path.to_path_buf()));
        }
        return Ok(());
    }

    debug!(path = %path.display(), "creating directory");
    fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_hint_wins_over_env() {
        let resolved = resolve_search_root(Some(Path::new("/opt/phoenix")), Some("/tmp/env"))
            .unwrap();
        assert_eq!(resolved.source, SearchRootSource::Explicit);
        assert_eq!(resolved.path, PathBuf::from("/opt/phoenix"));
    }

    #[test]
    fn env_value_used_without_hint() {
        let resolved = resolve_search_root(None, Some("/tmp/from-env")).unwrap();
        assert_eq!(resolved.source, SearchRootSource::EnvVar);
        assert!(resolved.path.ends_with("from-env"));
    }

    #[test]
    fn blank_env_value_falls_back_to_default() {
        let resolved = resolve_search_root(None, Some("  ")).unwrap();
        assert_eq!(resolved.source, SearchRootSource::Default);
        assert!(resolved.path.is_absolute());
        assert!(resolved.path.ends_with(DEFAULT_SEARCH_ROOT_RELATIVE));
    }

    #[test]
    fn result_dir_defaults_to_tmp_results() {
        let dir = resolve_result_dir(None).unwrap();
        assert!(dir.is_absolute());
        assert!(dir.ends_with(DEFAULT_RESULT_DIR_RELATIVE));
    }

    #[test]
    fn ensure_directory_is_idempotent() {
        let tmp = tempdir().unwrap();
        let nested = tmp.path().join("a/b/c");
        ensure_directory(&nested).unwrap();
        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn ensure_directory_rejects_files() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("file");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            ensure_directory(&file),
            Err(PathError::NotADirectory(_))
        ));
    }

    #[test]
    fn empty_path_is_rejected() {
        assert!(matches!(absolutize(Path::new("")), Err(PathError::EmptyPath)));
    }
}
