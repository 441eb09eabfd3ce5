//! Portfolio Engine - runs the analysis pipeline
//!
//! metrics -> aggregate -> health -> recommendations -> conflicts
//!
//! The engine is a pure function of (goals, capacity, now, config): no I/O, no
//! clock reads and no shared mutable state, so one engine can serve concurrent
//! callers.

use std::cmp::Ordering;

use chrono::NaiveDate;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::models::Goal;

use super::types::{GoalMetrics, PortfolioAnalysis};
use super::{aggregator, conflicts, health, metrics, recommendations};

/// Stateless analyzer over a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct PortfolioEngine {
    config: EngineConfig,
}

impl PortfolioEngine {
    /// Create an engine with the built-in thresholds
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a goal portfolio against a monthly savings capacity.
    ///
    /// Goals without a positive target are left out; if none remain the result
    /// is the `is_empty` sentinel. A non-finite capacity is a caller error.
    pub fn analyze(
        &self,
        goals: &[Goal],
        capacity: f64,
        now: NaiveDate,
    ) -> Result<PortfolioAnalysis> {
        if !capacity.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "capacity must be a finite number, got {}",
                capacity
            )));
        }

        let funding_model = self.config.conflicts.funding_model;
        let financial: Vec<&Goal> = goals.iter().filter(|g| g.is_financial()).collect();

        debug!(
            goals = goals.len(),
            financial = financial.len(),
            capacity,
            %now,
            funding = %funding_model,
            "Analyzing portfolio"
        );

        if financial.is_empty() {
            return Ok(PortfolioAnalysis::empty(capacity, now, funding_model));
        }

        // Input order is kept through the pipeline; ties resolve by it
        let goal_metrics: Vec<GoalMetrics> = financial
            .iter()
            .map(|g| metrics::calculate_goal_metrics(g, now, capacity, &self.config))
            .collect();

        let totals = aggregator::aggregate(&goal_metrics, capacity);
        debug!(
            remaining = totals.total_remaining,
            monthly_required = totals.monthly_required,
            realistic = totals.is_realistic,
            "Aggregated portfolio"
        );

        let health = health::score(&goal_metrics, &totals, capacity, &self.config.health);
        let recommendations = recommendations::generate(
            &goal_metrics,
            &totals,
            capacity,
            &self.config.recommendations,
        );
        let conflicts = conflicts::detect(
            &goal_metrics,
            &totals,
            capacity,
            now,
            &self.config.conflicts,
        );

        debug!(
            health = health.score,
            recommendations = recommendations.len(),
            conflicts = conflicts.len(),
            "Portfolio analysis complete"
        );

        let mut sorted = goal_metrics;
        sorted.sort_by(|a, b| by_deadline(a.target_date, b.target_date));

        Ok(PortfolioAnalysis {
            is_empty: false,
            analyzed_on: now,
            capacity,
            funding_model,
            goals: sorted,
            totals,
            health_score: health.score,
            health,
            recommendations,
            conflicts,
        })
    }
}

/// Earliest deadline first, undated goals last
fn by_deadline(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Analyze with the default configuration
pub fn analyze_portfolio(
    goals: &[Goal],
    capacity: f64,
    now: NaiveDate,
) -> Result<PortfolioAnalysis> {
    PortfolioEngine::new().analyze(goals, capacity, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FundingModel;
    use crate::models::GoalStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_non_finite_capacity_rejected() {
        let goals = vec![Goal::new("a", "Trip", 1000.0)];
        let now = date(2026, 1, 1);

        for capacity in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = analyze_portfolio(&goals, capacity, now).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_no_financial_goals_is_empty() {
        let goals = vec![Goal::new("a", "Learn piano", 0.0), Goal::new("b", "Refund", -50.0)];

        let analysis = analyze_portfolio(&goals, 500.0, date(2026, 1, 1)).unwrap();

        assert!(analysis.is_empty);
        assert_eq!(analysis.health_score, 0);
        assert!(analysis.goals.is_empty());
        assert!(analysis.recommendations.is_empty());
    }

    #[test]
    fn test_empty_input_is_empty() {
        let analysis = analyze_portfolio(&[], 500.0, date(2026, 1, 1)).unwrap();
        assert!(analysis.is_empty);
    }

    #[test]
    fn test_goals_sorted_by_deadline_undated_last() {
        let goals = vec![
            Goal::new("undated", "Fund", 1000.0),
            Goal::new("late", "House", 1000.0).with_target_date(date(2028, 1, 1)),
            Goal::new("soon", "Trip", 1000.0).with_target_date(date(2026, 5, 1)),
        ];

        let analysis = analyze_portfolio(&goals, 500.0, date(2026, 1, 1)).unwrap();

        let ids: Vec<_> = analysis.goals.iter().map(|g| g.goal_id.as_str()).collect();
        assert_eq!(ids, vec!["soon", "late", "undated"]);
        assert_eq!(analysis.totals.soonest_goal_id.as_deref(), Some("soon"));
    }

    #[test]
    fn test_engine_uses_configured_funding_model() {
        let engine = PortfolioEngine::with_config(
            EngineConfig::default().with_funding_model(FundingModel::Earmarked),
        );
        let goals = vec![Goal::new("a", "Trip", 1000.0).with_target_date(date(2026, 6, 1))];

        let analysis = engine.analyze(&goals, 100.0, date(2026, 1, 1)).unwrap();

        assert_eq!(analysis.funding_model, FundingModel::Earmarked);
        assert_eq!(analysis.goal("a").map(|g| g.status), Some(GoalStatus::Challenging));
    }
}
