use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use scout_cli::commands::{assignments, fetch, plan};
use scout_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Logs go to stderr so command output stays machine-readable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Fetch) => {
            let config = load_config(cli.config.as_deref())?;
            fetch::run(&mut io::stdout(), &config)?;
        }
        Some(Commands::Assignments { cached, json }) => {
            let config = load_config(cli.config.as_deref())?;
            assignments::run(&mut io::stdout(), &config, *cached, *json)?;
        }
        Some(Commands::Plan { cached, out }) => {
            let config = load_config(cli.config.as_deref())?;
            plan::run(&mut io::stdout(), &config, *cached, out.as_deref())?;
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
