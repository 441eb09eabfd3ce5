//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tandem - Plan a portfolio of savings goals together
#[derive(Parser)]
#[command(name = "tandem")]
#[command(about = "Goal portfolio planner: feasibility, health and timeline conflicts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine config file (defaults to the data dir override, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a goal portfolio (status, health, recommendations, conflicts)
    Analyze(PortfolioArgs),

    /// Show the month-by-month conflict timeline only
    Conflicts(PortfolioArgs),

    /// Show the active engine configuration and where it came from
    Config,

    /// Start the web server
    Serve {
        /// Goals document served by the portfolio endpoints
        #[arg(short, long)]
        goals: PathBuf,

        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Origin allowed for CORS requests (repeatable)
        ///
        /// Without this flag only same-origin requests are allowed.
        #[arg(long = "allowed-origin")]
        allowed_origins: Vec<String>,
    },
}

/// Inputs shared by the analysis commands
#[derive(Args, Debug, Clone)]
pub struct PortfolioArgs {
    /// Goals document: a JSON array of goals or {"goals": [...]}
    #[arg(short, long)]
    pub goals: PathBuf,

    /// Monthly savings capacity
    #[arg(short, long, allow_hyphen_values = true)]
    pub capacity: f64,

    /// Analysis date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub now: Option<String>,

    /// Funding model for conflicts: shared-pool, earmarked (overrides config)
    #[arg(long)]
    pub funding: Option<String>,

    /// Print the analysis as JSON
    #[arg(long)]
    pub json: bool,
}
