//! Resolve command handler.

use anyhow::Result;
use phoenix_core::SessionOptions;
use phoenix_runtime::{BinaryState, Session};

use crate::error::CliError;

/// Execute the resolve command.
///
/// Opens a session (which searches locally and downloads if needed) and
/// prints where the binary lives.
pub async fn execute(options: SessionOptions) -> Result<()> {
    let session = Session::open(options).await;

    match session.binary_state() {
        BinaryState::Resolved(resolution) => {
            println!("variant = {}", session.variant());
            println!("binary  = {}", resolution.path.display());
            println!("source  = {}", resolution.source);
            println!("results = {}", session.result_path().display());
            Ok(())
        }
        BinaryState::Unavailable { reason } => Err(CliError::Unavailable(reason.clone()).into()),
    }
}
