//! Command handlers.
//!
//! Handlers are thin wrappers that:
//! 1. Turn CLI arguments into session options or a run configuration
//! 2. Call into `phoenix-runtime`
//! 3. Format the result for the terminal
//!
//! Failures that should change the exit code are returned as
//! [`CliError`](crate::CliError) inside the `anyhow` error.

pub mod detect;
pub mod pattern;
pub mod resolve;
pub mod run;
