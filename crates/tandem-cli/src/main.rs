//! Tandem CLI - Goal portfolio planner
//!
//! Usage:
//!   tandem analyze --goals goals.json --capacity 2500    Full portfolio report
//!   tandem conflicts --goals goals.json --capacity 2500  Conflict timeline
//!   tandem config                                        Show engine config
//!   tandem serve --goals goals.json --port 3000          Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Analyze(args) => commands::cmd_analyze(config_path, &args).await,
        Commands::Conflicts(args) => commands::cmd_conflicts(config_path, &args).await,
        Commands::Config => commands::cmd_config(config_path),
        Commands::Serve {
            goals,
            port,
            host,
            allowed_origins,
        } => commands::cmd_serve(config_path, &goals, &host, port, allowed_origins).await,
    }
}
