//! Run command handler.

use anyhow::Result;
use phoenix_core::{RunConfig, SessionOptions};
use phoenix_runtime::{BinaryState, RunOutcome, Session};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::CliError;

/// Build the run configuration from an optional JSON file plus `key=value`
/// assignments. Assignments override file entries with the same key.
pub fn load_run_config(file: Option<&Path>, assignments: &[String]) -> Result<RunConfig, CliError> {
    let mut config = match file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
            RunConfig::from_json_str(&text)?
        }
        None => RunConfig::new(),
    };

    for assignment in assignments {
        config.apply_assignment(assignment)?;
    }

    Ok(config)
}

/// Execute the run command.
pub async fn execute(
    options: SessionOptions,
    config_file: Option<&Path>,
    assignments: &[String],
) -> Result<()> {
    let config = load_run_config(config_file, assignments)?;
    debug!(entries = config.len(), "run configuration loaded");

    let session = Session::open(options).await;

    match session.run(&config).await {
        RunOutcome::Completed => {
            println!("Results written to {}", session.result_path().display());
            Ok(())
        }
        RunOutcome::Unavailable => {
            let reason = match session.binary_state() {
                BinaryState::Unavailable { reason } => reason.clone(),
                BinaryState::Resolved(_) => String::new(),
            };
            Err(CliError::Unavailable(reason).into())
        }
        RunOutcome::LaunchFailed { reason } => Err(CliError::Process(reason).into()),
        RunOutcome::Failed { code, .. } => Err(CliError::Simulation { code }.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phoenix_core::FlagValue;
    use tempfile::tempdir;

    #[test]
    fn test_assignments_override_file_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(&path, r#"{"tmax": 100, "N": [128, 128], "gammaC": 0.1}"#).unwrap();

        let config = load_run_config(
            Some(&path),
            &["tmax=500".to_string(), "L=64 64".to_string()],
        )
        .unwrap();

        let keys: Vec<&str> = config.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["tmax", "N", "gammaC", "L"]);
        assert_eq!(config.get("tmax"), Some(&FlagValue::Scalar("500".into())));
        assert_eq!(
            config.get("L"),
            Some(&FlagValue::List(vec!["64".into(), "64".into()]))
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_run_config(Some(Path::new("/nonexistent/run.json")), &[]).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn test_non_object_json_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let err = load_run_config(Some(&path), &[]).unwrap_err();
        assert_eq!(err.exit_code(), 78);
    }
}
