//! Detect command handler.

use anyhow::Result;
use phoenix_core::Platform;
use phoenix_core::ports::AcceleratorProbePort;

// ANSI color codes for better UX
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Execute the detect command.
///
/// Probes for an accelerator and prints what a session on this machine
/// would select. Probe failures are shown, never returned as errors.
pub fn execute(probe: &dyn AcceleratorProbePort, platform: &Platform, json: bool) -> Result<()> {
    let report = probe.probe();
    let device_count = report.as_ref().map_or(0, |r| r.device_count);
    let gpu_usable = platform.supports_accelerator() && device_count > 0;

    if json {
        let value = serde_json::json!({
            "platform": {
                "system": platform.system_name(),
                "machine": platform.machine_name(),
            },
            "device_count": device_count,
            "gpu_supported": platform.supports_accelerator(),
            "gpu_usable": gpu_usable,
            "error": report.as_ref().err().map(ToString::to_string),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{BOLD}Platform:{RESET} {platform}");
    match &report {
        Ok(report) => println!("{BOLD}GPUs attached:{RESET} {}", report.device_count),
        Err(e) => println!("{BOLD}GPUs attached:{RESET} 0 {YELLOW}({e}){RESET}"),
    }

    if !platform.supports_accelerator() {
        println!(
            "{YELLOW}GPU builds are not available for {}{RESET}",
            platform.system_name()
        );
    } else if gpu_usable {
        println!("{GREEN}GPU build will be used{RESET}");
    } else {
        println!("{YELLOW}No GPU detected; use --cpu to select the CPU build{RESET}");
    }

    Ok(())
}
