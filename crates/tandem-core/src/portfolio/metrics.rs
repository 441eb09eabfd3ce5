//! Goal Metrics Calculator
//!
//! Derives saved/remaining amounts, deadline distance, the monthly amount a
//! goal needs and its status against the savings capacity. Pure function of
//! (goal, now, capacity, config).

use chrono::NaiveDate;

use crate::config::{EngineConfig, PriorityWindows, StatusThresholds};
use crate::models::{Goal, GoalPriority, GoalStatus};

use super::types::GoalMetrics;

/// Compute metrics for a single goal
pub fn calculate_goal_metrics(
    goal: &Goal,
    now: NaiveDate,
    capacity: f64,
    config: &EngineConfig,
) -> GoalMetrics {
    let total_saved = stable_sum(goal.contributions.iter().map(|c| c.amount)).max(0.0);
    let remaining = goal.target_amount - total_saved;

    let percentage_saved = if goal.target_amount > 0.0 {
        total_saved / goal.target_amount * 100.0
    } else {
        0.0
    };

    let days_until_deadline = goal.target_date.map(|d| (d - now).num_days());
    let months_until_deadline =
        days_until_deadline.map(|days| months_from_days(days, config.status.days_per_month));

    let monthly_required = match months_until_deadline {
        Some(months) if remaining > 0.0 => remaining / months as f64,
        _ => 0.0,
    };

    let status = classify_status(
        percentage_saved,
        monthly_required,
        capacity,
        &config.status,
    );
    let priority = classify_priority(days_until_deadline, &config.priority);

    GoalMetrics {
        goal_id: goal.id.clone(),
        title: goal.title.clone(),
        target_amount: goal.target_amount,
        target_date: goal.target_date,
        total_saved,
        remaining,
        percentage_saved,
        days_until_deadline,
        months_until_deadline,
        monthly_required,
        status,
        priority,
        contribution_count: goal.contributions.len(),
        last_contribution_date: goal.contributions.iter().filter_map(|c| c.date).max(),
    }
}

/// ceil(days / days_per_month), floored at 1 so overdue goals stay maximally urgent
pub fn months_from_days(days: i64, days_per_month: i64) -> u32 {
    if days <= 0 || days_per_month <= 0 {
        return 1;
    }
    let months = (days + days_per_month - 1) / days_per_month;
    u32::try_from(months).unwrap_or(u32::MAX).max(1)
}

/// Status from the monthly requirement relative to capacity
pub fn classify_status(
    percentage_saved: f64,
    monthly_required: f64,
    capacity: f64,
    thresholds: &StatusThresholds,
) -> GoalStatus {
    if percentage_saved >= 100.0 {
        return GoalStatus::Complete;
    }
    if monthly_required <= 0.0 {
        return GoalStatus::NoDeadline;
    }
    // No savings capacity: any monthly requirement is out of reach
    if capacity <= 0.0 {
        return GoalStatus::Unrealistic;
    }

    if monthly_required <= capacity * thresholds.on_track_ratio {
        GoalStatus::OnTrack
    } else if monthly_required <= capacity {
        GoalStatus::Achievable
    } else if monthly_required <= capacity * thresholds.challenging_ratio {
        GoalStatus::Challenging
    } else {
        GoalStatus::Unrealistic
    }
}

/// Priority from days until the deadline only
pub fn classify_priority(days_until: Option<i64>, windows: &PriorityWindows) -> GoalPriority {
    match days_until {
        None => GoalPriority::Medium,
        Some(days) if days < windows.high_within_days => GoalPriority::High,
        Some(days) if days < windows.medium_within_days => GoalPriority::Medium,
        Some(_) => GoalPriority::Low,
    }
}

/// Order-independent sum: values are added in sorted order so that the same
/// multiset always produces the same bits
pub(crate) fn stable_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.into_iter().sum()
}
