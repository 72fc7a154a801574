//! Subcommands and their shared argument groups.

use clap::{Args, Subcommand};
use phoenix_core::{PHOENIX_PATH_ENV, Precision, RELEASE_URL_ENV, SessionOptions};
use std::path::PathBuf;

/// Which PHOENIX build to use.
#[derive(Args, Debug, Clone)]
pub struct VariantArgs {
    /// Floating point precision (fp32 or fp64)
    #[arg(long, default_value = "fp32")]
    pub precision: Precision,

    /// Use the CPU build even if a GPU is available
    #[arg(long)]
    pub cpu: bool,

    /// Use the SFML (live visualisation) build
    #[arg(long)]
    pub sfml: bool,
}

/// Options shared by every command that opens a session.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    #[command(flatten)]
    pub variant: VariantArgs,

    /// Directory tree searched for PHOENIX builds
    #[arg(long, env = PHOENIX_PATH_ENV)]
    pub hint: Option<PathBuf>,

    /// Output directory (default: tmp_phoenix_results)
    #[arg(short = 'o', long = "results")]
    pub results: Option<PathBuf>,

    /// CUDA device index
    #[arg(long, default_value_t = 0)]
    pub gpu_id: u32,

    /// Base URL of the release downloads
    #[arg(long, env = RELEASE_URL_ENV)]
    pub release_url: Option<String>,
}

impl SessionArgs {
    /// Session options for this invocation; explicit flags win over the environment.
    pub fn to_options(&self, debug: bool) -> SessionOptions {
        let mut options = SessionOptions::from_env()
            .precision(self.variant.precision)
            .use_gpu(!self.variant.cpu)
            .sfml(self.variant.sfml)
            .gpu_id(self.gpu_id)
            .debug(debug);

        if let Some(hint) = &self.hint {
            options = options.hint_path(hint);
        }
        if let Some(results) = &self.results {
            options = options.result_path(results);
        }
        if let Some(url) = self.release_url.as_deref().filter(|u| !u.trim().is_empty()) {
            options = options.release_base_url(url.trim());
        }
        options
    }
}

/// Available commands for the PHOENIX launcher.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report whether an NVIDIA GPU is available
    Detect {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find (or download) the PHOENIX binary without running it
    Resolve {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Resolve PHOENIX and run one simulation
    Run {
        #[command(flatten)]
        session: SessionArgs,

        /// JSON file with the run configuration (an object of flag -> value)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Set a flag, e.g. `--set tmax=500` or `--set "N=256 256"`; repeatable
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Show the search pattern and release file name for a variant
    Pattern {
        #[command(flatten)]
        variant: VariantArgs,
    },
}
