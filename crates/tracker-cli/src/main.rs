use anyhow::{Result, anyhow};
use clap::Parser;

use tracker_cli::cli::{Cli, Commands};
use tracker_cli::config::loader::load_config;
use tracker_cli::output::print_error;
use tracker_cli::{commands, observability};

#[tokio::main]
async fn main() {
    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound) {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref()).map_err(|e| anyhow!(e))?;

    let level = cli.log_level.as_deref().unwrap_or(&cfg.logging.level);
    observability::init_tracing_with_level(level);
    tracing::debug!(config = ?cli.config, level, "Configuration loaded");

    match &cli.command {
        Commands::Map(args) => commands::map::run(args, &cfg.search).await?,
        Commands::Metadata(args) => commands::metadata::run(args)?,
        Commands::Oidc(args) => commands::oidc::run(args, &cfg.auth)?,
    }

    Ok(())
}
