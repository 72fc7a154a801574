//! Command-line front end for the PHOENIX launcher.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings for the binary target
#[cfg(test)]
use tempfile as _;

// Used by main.rs only
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

// Re-export primary types for convenient access
pub use commands::{Commands, SessionArgs, VariantArgs};
pub use error::CliError;
pub use parser::Cli;
