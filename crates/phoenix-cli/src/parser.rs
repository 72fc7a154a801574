//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for launching PHOENIX simulations.
#[derive(Parser, Debug)]
#[command(name = "phoenix")]
#[command(about = "Find, download and run PHOENIX simulation builds")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output (also streams all PHOENIX output)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use phoenix_core::Precision;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_arguments() {
        let cli = Cli::parse_from([
            "phoenix",
            "run",
            "--precision",
            "fp64",
            "--cpu",
            "--hint",
            "/opt/phoenix",
            "--set",
            "tmax=500",
            "--set",
            "N=256 256",
            "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Run { session, set, config }) => {
                assert_eq!(session.variant.precision, Precision::Fp64);
                assert!(session.variant.cpu);
                assert_eq!(session.hint, Some(PathBuf::from("/opt/phoenix")));
                assert_eq!(set, vec!["tmax=500", "N=256 256"]);
                assert!(config.is_none());

                let options = session.to_options(cli.verbose);
                assert!(!options.use_gpu);
                assert!(options.debug);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_precision_is_rejected() {
        assert!(Cli::try_parse_from(["phoenix", "pattern", "--precision", "fp16"]).is_err());
    }
}
