//! Shared utilities for the portfolio commands
//!
//! This module contains:
//! - `load_engine` - Engine from the resolved config, with an optional funding override
//! - `load_goals` - Read a goals document
//! - `parse_now` - Analysis date from `--now` or today
//! - `run_analysis` - Load everything and analyze

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use tandem_core::models::{parse_date, Goal};
use tandem_core::{
    EngineConfig, FundingModel, GoalSource, JsonFileGoalSource, PortfolioAnalysis,
    PortfolioEngine,
};

use crate::cli::PortfolioArgs;

/// Engine from `--config` (or the default resolution), optionally overriding
/// the funding model
pub fn load_engine(config_path: Option<&Path>, funding: Option<&str>) -> Result<PortfolioEngine> {
    let mut config = EngineConfig::load(config_path).context("Failed to load engine config")?;

    if let Some(funding) = funding {
        let model: FundingModel = funding.parse().map_err(|e: String| anyhow!(e))?;
        config = config.with_funding_model(model);
    }

    Ok(PortfolioEngine::with_config(config))
}

pub async fn load_goals(path: &Path) -> Result<Vec<Goal>> {
    JsonFileGoalSource::new(path)
        .load_goals()
        .await
        .with_context(|| format!("Failed to load goals from {}", path.display()))
}

/// `--now` as a date, defaulting to today (local time)
pub fn parse_now(now: Option<&str>) -> Result<NaiveDate> {
    match now {
        Some(s) => parse_date(s).ok_or_else(|| anyhow!("Invalid date '{}'. Use YYYY-MM-DD", s)),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

pub async fn run_analysis(
    config_path: Option<&Path>,
    args: &PortfolioArgs,
) -> Result<PortfolioAnalysis> {
    let engine = load_engine(config_path, args.funding.as_deref())?;
    let now = parse_now(args.now.as_deref())?;
    let goals = load_goals(&args.goals).await?;

    engine
        .analyze(&goals, args.capacity, now)
        .context("Portfolio analysis failed")
}
