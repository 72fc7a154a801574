//! Pattern command handler.
//!
//! Shows the file names a session would look for, which helps when placing
//! self-built binaries under `PHOENIX_PATH`.

use anyhow::Result;
use phoenix_core::{Acceleration, Platform, VariantSignature};

use crate::commands::VariantArgs;

/// Signature selected by `args`, ignoring accelerator detection.
pub fn signature(args: &VariantArgs) -> VariantSignature {
    VariantSignature::new(
        Acceleration::from_gpu_flag(!args.cpu),
        args.precision,
        args.sfml,
    )
}

/// Execute the pattern command.
pub fn execute(args: &VariantArgs, platform: &Platform) -> Result<()> {
    let signature = signature(args);
    println!("variant          = {signature}");
    println!("search_pattern   = {}", signature.search_pattern(platform));
    println!("release_filename = {}", signature.release_filename(platform));
    Ok(())
}
