//! Tandem Core Library
//!
//! Shared functionality for the Tandem goal portfolio planner:
//! - Goal and contribution models with lenient decoding
//! - Portfolio engine (metrics, totals, health score, recommendations,
//!   timeline conflicts)
//! - Engine configuration with layered TOML overrides
//! - Pluggable goal sources and a fetch-aware portfolio service

pub mod config;
pub mod error;
pub mod models;
pub mod portfolio;
pub mod service;
pub mod source;

pub use config::{EngineConfig, FundingModel};
pub use error::{Error, Result};
pub use models::{Contribution, Goal, GoalPriority, GoalStatus, GoalsDocument};
pub use portfolio::{
    analyze_portfolio, ConflictSeverity, GoalMetrics, HealthBreakdown, PortfolioAnalysis,
    PortfolioEngine, PortfolioTotals, Recommendation, RecommendationType, TimelineConflict,
};
pub use service::{FetchPolicy, PortfolioService};
pub use source::{parse_goals, GoalSource, InMemoryGoalSource, JsonFileGoalSource};
