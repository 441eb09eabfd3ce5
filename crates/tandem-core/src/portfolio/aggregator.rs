//! Portfolio Aggregator
//!
//! Rolls per-goal metrics into portfolio totals and compares the overall
//! monthly requirement (driven by the soonest deadline) against capacity.

use super::metrics::stable_sum;
use super::types::{GoalMetrics, PortfolioTotals};

/// Aggregate metrics of financial goals (target > 0) into totals
pub fn aggregate(metrics: &[GoalMetrics], capacity: f64) -> PortfolioTotals {
    let total_budget_needed = stable_sum(metrics.iter().map(|m| m.target_amount));
    let total_saved = stable_sum(metrics.iter().map(|m| m.total_saved));
    let total_remaining = total_budget_needed - total_saved;

    let percentage_saved = if total_budget_needed > 0.0 {
        total_saved / total_budget_needed * 100.0
    } else {
        0.0
    };

    // Earliest deadline wins; ties keep input order
    let soonest = metrics
        .iter()
        .filter_map(|m| m.target_date.map(|d| (d, m)))
        .min_by_key(|(d, _)| *d)
        .map(|(_, m)| m);

    let (monthly_required, is_realistic) = match soonest.and_then(|m| m.months_until_deadline) {
        Some(months) => {
            let required = total_remaining.max(0.0) / months as f64;
            (required, required - capacity <= 0.0)
        }
        // Without any deadline there is nothing to fund monthly
        None => (0.0, true),
    };

    PortfolioTotals {
        goal_count: metrics.len(),
        total_budget_needed,
        total_saved,
        total_remaining,
        percentage_saved,
        soonest_goal_id: soonest.map(|m| m.goal_id.clone()),
        soonest_deadline: soonest.and_then(|m| m.target_date),
        months_until_soonest: soonest.and_then(|m| m.months_until_deadline),
        monthly_required,
        monthly_gap: monthly_required - capacity,
        is_realistic,
    }
}
