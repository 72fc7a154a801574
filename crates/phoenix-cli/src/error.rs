//! CLI-specific error types and exit code mapping.

use phoenix_core::RunConfigError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No runnable PHOENIX binary could be obtained.
    #[error("PHOENIX is not available: {0}")]
    Unavailable(String),

    /// The simulation could not be started.
    #[error("Process error: {0}")]
    Process(String),

    /// The simulation ran and exited with a failure status.
    #[error("PHOENIX exited with {}", describe_exit(.code))]
    Simulation { code: Option<i32> },
}

fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}"))
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    ///
    /// A failed simulation passes its own exit status through.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Arguments(_) => 2,    // EX_USAGE
            CliError::Io(_) => 74,          // EX_IOERR
            CliError::Config(_) => 78,      // EX_CONFIG
            CliError::Unavailable(_) => 69, // EX_UNAVAILABLE
            CliError::Process(_) => 71,     // EX_OSERR
            CliError::Simulation { code } => code.filter(|c| *c != 0).unwrap_or(1),
        }
    }
}

impl From<RunConfigError> for CliError {
    fn from(err: RunConfigError) -> Self {
        match err {
            RunConfigError::InvalidAssignment(_) => CliError::Arguments(err.to_string()),
            _ => CliError::Config(err.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Arguments("x".into()).exit_code(), 2);
        assert_eq!(CliError::Config("x".into()).exit_code(), 78);
        assert_eq!(CliError::Unavailable("x".into()).exit_code(), 69);
        assert_eq!(CliError::Simulation { code: Some(3) }.exit_code(), 3);
        assert_eq!(CliError::Simulation { code: None }.exit_code(), 1);
    }

    #[test]
    fn test_bad_assignment_is_usage_error() {
        let err: CliError = RunConfigError::InvalidAssignment("tmax".into()).into();
        assert_eq!(err.exit_code(), 2);
    }
}
