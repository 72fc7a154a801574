//! PHOENIX command invocation builder.
//!
//! Turns a [`RunConfig`] plus session state into the argument vector PHOENIX
//! expects. The argument list is computed separately from the `Command` so
//! it can be inspected and logged without spawning anything.

use phoenix_core::RunConfig;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Output directory flag.
pub const PATH_FLAG: &str = "--path";

/// Disables the SFML window.
pub const NO_SFML_FLAG: &str = "-nosfml";

/// Builder for constructing a PHOENIX simulation command.
///
/// # Example
///
/// ```rust,ignore
/// let cmd = PhoenixCommandBuilder::new(binary, result_dir)
///     .config(&run_config)
///     .sfml(false)
///     .env("CUDA_VISIBLE_DEVICES", "0")
///     .build();
/// ```
pub struct PhoenixCommandBuilder {
    binary_path: PathBuf,
    result_dir: PathBuf,
    config_args: Vec<(String, Vec<String>)>,
    sfml: bool,
    envs: Vec<(OsString, OsString)>,
}

impl PhoenixCommandBuilder {
    pub fn new(binary_path: impl Into<PathBuf>, result_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
            result_dir: result_dir.into(),
            config_args: Vec::new(),
            sfml: false,
            envs: Vec::new(),
        }
    }

    /// Append every key of `config` in mapping order.
    #[must_use]
    pub fn config(mut self, config: &RunConfig) -> Self {
        for (key, value) in config.iter() {
            self.config_args.push((
                key.to_string(),
                value.tokens().into_iter().map(str::to_string).collect(),
            ));
        }
        self
    }

    /// Whether the SFML window stays enabled.
    #[must_use]
    pub const fn sfml(mut self, enabled: bool) -> Self {
        self.sfml = enabled;
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn envs(mut self, vars: impl IntoIterator<Item = (OsString, OsString)>) -> Self {
        self.envs.extend(vars);
        self
    }

    /// Argument vector in the order PHOENIX receives it:
    /// 1. `--<key> <value...>` for each configuration entry
    /// 2. `--path <result_dir>`
    /// 3. `--path .` (PHOENIX reads initial conditions relative to the working directory)
    /// 4. `-nosfml` unless SFML is enabled
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();

        for (key, values) in &self.config_args {
            args.push(format!("--{key}"));
            args.extend(values.iter().cloned());
        }

        args.push(PATH_FLAG.to_string());
        args.push(self.result_dir.display().to_string());

        // Both values are passed; PHOENIX keeps the last one it parses.
        args.push(PATH_FLAG.to_string());
        args.push(".".to_string());

        if !self.sfml {
            args.push(NO_SFML_FLAG.to_string());
        }

        args
    }

    /// Human-readable command line for logging.
    pub fn command_line(&self) -> String {
        let mut line = self.binary_path.display().to_string();
        for arg in self.args() {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }

    /// Build the final Command with piped stdout/stderr.
    pub fn build(self) -> Command {
        let mut cmd = Command::new(&self.binary_path);
        cmd.args(self.args())
            .envs(self.envs)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}
