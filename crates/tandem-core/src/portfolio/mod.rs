//! Portfolio Engine - Goal Portfolio Intelligence
//!
//! Given a set of savings goals, the user's monthly savings capacity and the
//! current date, the engine answers: is the overall plan realistic, how healthy
//! is the portfolio, what should change, and in which months do deadlines
//! collide with available cash?
//!
//! ## Pipeline
//!
//! - **Metrics** - per-goal saved/remaining, monthly requirement, status, priority
//! - **Aggregator** - portfolio totals driven by the soonest deadline
//! - **Health** - 0-100 score from progress, feasibility, time buffer, distribution
//! - **Recommendations** - up to three ordered suggestions
//! - **Conflicts** - month buckets checked against projected cash
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tandem_core::portfolio::PortfolioEngine;
//!
//! let engine = PortfolioEngine::with_config(EngineConfig::load(None)?);
//! let analysis = engine.analyze(&goals, 2500.0, today)?;
//! ```

pub mod aggregator;
pub mod conflicts;
pub mod engine;
pub mod health;
pub mod metrics;
pub mod recommendations;
pub mod types;

pub use engine::{analyze_portfolio, PortfolioEngine};
pub use metrics::calculate_goal_metrics;
pub use types::{
    ConflictGoal, ConflictSeverity, ConflictSuggestion, GoalMetrics, HealthBreakdown, Level,
    PortfolioAnalysis, PortfolioTotals, Recommendation, RecommendationType, SuggestionKind,
    TimelineConflict,
};
