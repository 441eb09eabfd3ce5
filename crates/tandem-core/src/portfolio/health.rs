//! 4-factor portfolio health scoring.
//!
//! score = progress (40) + feasibility (30) + time buffer (20) + distribution (10)
//!
//! Every input is a sum or a count, so the score does not depend on goal order.

use crate::config::HealthSettings;

use super::metrics::stable_sum;
use super::types::{GoalMetrics, HealthBreakdown, PortfolioTotals};

const MAX_PROGRESS: f64 = 40.0;
const MAX_FEASIBILITY: f64 = 30.0;
const MAX_TIME_BUFFER: f64 = 20.0;
const MAX_DISTRIBUTION: f64 = 10.0;

/// Score a non-empty portfolio
pub fn score(
    metrics: &[GoalMetrics],
    totals: &PortfolioTotals,
    capacity: f64,
    settings: &HealthSettings,
) -> HealthBreakdown {
    let progress = (totals.percentage_saved * 0.4).clamp(0.0, MAX_PROGRESS);
    let feasibility = feasibility(metrics, totals, capacity);
    let time_buffer = time_buffer(metrics, settings);
    let distribution = distribution(metrics, settings);

    let total = (progress + feasibility + time_buffer + distribution).clamp(0.0, 100.0);

    HealthBreakdown {
        progress,
        feasibility,
        time_buffer,
        distribution,
        score: total.round() as u8,
    }
}

/// Full marks when realistic, otherwise partial credit for the share of
/// per-goal requirements the capacity covers
fn feasibility(metrics: &[GoalMetrics], totals: &PortfolioTotals, capacity: f64) -> f64 {
    if totals.is_realistic {
        return MAX_FEASIBILITY;
    }
    let required = stable_sum(metrics.iter().map(|m| m.monthly_required));
    if required <= 0.0 {
        return MAX_FEASIBILITY;
    }
    (capacity / required * MAX_FEASIBILITY).clamp(0.0, MAX_FEASIBILITY)
}

fn time_buffer(metrics: &[GoalMetrics], settings: &HealthSettings) -> f64 {
    if metrics.is_empty() {
        return 0.0;
    }
    let months = stable_sum(metrics.iter().map(|m| {
        m.months_until_deadline
            .map(f64::from)
            .unwrap_or(settings.undated_goal_months)
    }));
    let average = months / metrics.len() as f64;
    (average / settings.buffer_horizon_months * MAX_TIME_BUFFER).clamp(0.0, MAX_TIME_BUFFER)
}

fn distribution(metrics: &[GoalMetrics], settings: &HealthSettings) -> f64 {
    if metrics.is_empty() {
        return 0.0;
    }
    let halfway = metrics
        .iter()
        .filter(|m| m.percentage_saved >= settings.distribution_threshold_pct)
        .count();
    halfway as f64 / metrics.len() as f64 * MAX_DISTRIBUTION
}
