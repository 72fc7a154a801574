//! CLI entry point.
//!
//! Loads `.env`, parses arguments, installs logging and dispatches to the
//! handlers. Errors carrying a [`CliError`] choose the process exit code.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use phoenix_cli::{Cli, CliError, Commands, handlers};
use phoenix_core::Platform;
use phoenix_runtime::NvidiaSmiProbe;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Detect { json } => {
            handlers::detect::execute(&NvidiaSmiProbe::new(), &Platform::current(), json)?;
        }
        Commands::Resolve { session } => {
            handlers::resolve::execute(session.to_options(cli.verbose)).await?;
        }
        Commands::Run {
            session,
            config,
            set,
        } => {
            handlers::run::execute(session.to_options(cli.verbose), config.as_deref(), &set)
                .await?;
        }
        Commands::Pattern { variant } => {
            handlers::pattern::execute(&variant, &Platform::current())?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if let Err(err) = dispatch(cli).await {
        eprintln!("Error: {err:#}");
        let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
}
