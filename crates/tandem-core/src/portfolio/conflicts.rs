//! Timeline Conflict Detector
//!
//! Groups outstanding dated goals by calendar month and checks each month's
//! demand against the cash projected to be available by then.
//!
//! ## Funding Models
//!
//! - `shared_pool`: available = total saved + capacity x months until the month
//! - `earmarked`: savings already belong to their goals, so a month only gets
//!   future accrual not claimed by earlier months:
//!   available = max(0, capacity x months until - demand of earlier months)

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::config::{ConflictSettings, FundingModel};
use crate::models::GoalPriority;

use super::metrics::stable_sum;
use super::types::{
    ConflictGoal, ConflictSeverity, ConflictSuggestion, GoalMetrics, PortfolioTotals,
    SuggestionKind, TimelineConflict,
};

/// Goals due in one calendar month
struct MonthBucket {
    year: i32,
    month: u32,
    goals: Vec<ConflictGoal>,
}

impl MonthBucket {
    fn total_needed(&self) -> f64 {
        stable_sum(self.goals.iter().map(|g| g.remaining))
    }
}

/// Detect month-level funding conflicts, in chronological order
pub fn detect(
    metrics: &[GoalMetrics],
    totals: &PortfolioTotals,
    capacity: f64,
    now: NaiveDate,
    settings: &ConflictSettings,
) -> Vec<TimelineConflict> {
    let buckets = bucket_by_month(metrics);
    let accrual = capacity.max(0.0);

    let mut conflicts = Vec::new();
    let mut earlier_demand = 0.0;

    for bucket in buckets.into_values() {
        let total_needed = bucket.total_needed();
        let months_until = months_between(now, bucket.year, bucket.month);
        let accrued = accrual * f64::from(months_until);

        let available_cash = match settings.funding_model {
            FundingModel::SharedPool => totals.total_saved + accrued,
            FundingModel::Earmarked => (accrued - earlier_demand).max(0.0),
        };
        earlier_demand += total_needed;

        let is_conflict = total_needed > available_cash;
        let shortage = (total_needed - available_cash).max(0.0);
        let severity_ratio = total_needed / available_cash.max(1.0);
        let percentage_used = severity_ratio * 100.0;

        let retained = is_conflict
            || bucket.goals.len() > 1
            || percentage_used > settings.utilization_threshold_pct;
        if !retained {
            continue;
        }

        let key = format!("{:04}-{:02}", bucket.year, bucket.month);
        let severity = classify_severity(severity_ratio);
        if is_conflict {
            debug!(
                month = %key,
                needed = total_needed,
                available = available_cash,
                shortage,
                severity = %severity,
                "Timeline conflict"
            );
        }

        let suggestions = if is_conflict {
            conflict_suggestions(&bucket.goals, shortage, capacity, months_until, settings)
        } else {
            vec![spread_suggestion(&bucket.goals)]
        };

        conflicts.push(TimelineConflict {
            key,
            year: bucket.year,
            month: bucket.month,
            goals: bucket.goals,
            total_needed,
            months_until,
            available_cash,
            is_conflict,
            shortage,
            severity_ratio,
            severity,
            percentage_used,
            suggestions,
        });
    }

    conflicts
}

/// Bucket outstanding dated goals by (year, month); goals keep input order
fn bucket_by_month(metrics: &[GoalMetrics]) -> BTreeMap<(i32, u32), MonthBucket> {
    let mut buckets: BTreeMap<(i32, u32), MonthBucket> = BTreeMap::new();

    for m in metrics {
        let Some(target_date) = m.target_date else {
            continue;
        };
        if m.remaining <= 0.0 {
            continue;
        }

        let key = (target_date.year(), target_date.month());
        buckets
            .entry(key)
            .or_insert_with(|| MonthBucket {
                year: key.0,
                month: key.1,
                goals: Vec::new(),
            })
            .goals
            .push(ConflictGoal {
                goal_id: m.goal_id.clone(),
                title: m.title.clone(),
                remaining: m.remaining,
                target_date,
                priority: m.priority,
            });
    }

    buckets
}

/// Whole calendar months from `now` to the given month, never negative
pub fn months_between(now: NaiveDate, year: i32, month: u32) -> u32 {
    let diff = (i64::from(year) - i64::from(now.year())) * 12 + i64::from(month)
        - i64::from(now.month());
    u32::try_from(diff.max(0)).unwrap_or(u32::MAX)
}

/// Severity from demand / available. MODERATE and CRITICAL start strictly
/// above their bounds; HIGH includes 1.2.
pub fn classify_severity(ratio: f64) -> ConflictSeverity {
    if ratio > 1.5 {
        ConflictSeverity::Critical
    } else if ratio >= 1.2 {
        ConflictSeverity::High
    } else if ratio > 1.0 {
        ConflictSeverity::Moderate
    } else {
        ConflictSeverity::Safe
    }
}

fn conflict_suggestions(
    goals: &[ConflictGoal],
    shortage: f64,
    capacity: f64,
    months_until: u32,
    settings: &ConflictSettings,
) -> Vec<ConflictSuggestion> {
    let mut suggestions = Vec::new();

    // Delay the cheapest goal that is not HIGH priority
    if capacity > 0.0 {
        let mut cheapest: Option<&ConflictGoal> = None;
        for goal in goals.iter().filter(|g| g.priority != GoalPriority::High) {
            if cheapest.map_or(true, |c| goal.remaining < c.remaining) {
                cheapest = Some(goal);
            }
        }
        if let Some(goal) = cheapest {
            let months = ((shortage / capacity).ceil().min(f64::from(u32::MAX)) as u32)
                .saturating_add(settings.delay_buffer_months);
            suggestions.push(ConflictSuggestion {
                kind: SuggestionKind::DelayGoal,
                goal_id: Some(goal.goal_id.clone()),
                amount: None,
                months: Some(months),
                description: format!(
                    "Delay \"{}\" by {} month{}",
                    goal.title,
                    months,
                    if months == 1 { "" } else { "s" }
                ),
            });
        }
    }

    let increase = (shortage / f64::from(months_until.max(1))).ceil();
    suggestions.push(ConflictSuggestion {
        kind: SuggestionKind::IncreaseSavings,
        goal_id: None,
        amount: Some(increase),
        months: None,
        description: format!("Save an extra {:.0} per month", increase),
    });

    // Largest goal; ties keep the first
    let mut largest: Option<&ConflictGoal> = None;
    for goal in goals {
        if largest.map_or(true, |l| goal.remaining > l.remaining) {
            largest = Some(goal);
        }
    }
    if let Some(goal) = largest {
        let reduction = (goal.remaining * settings.trim_ratio).min(shortage);
        suggestions.push(ConflictSuggestion {
            kind: SuggestionKind::ReduceTarget,
            goal_id: Some(goal.goal_id.clone()),
            amount: Some(reduction),
            months: None,
            description: format!("Reduce \"{}\" by {:.0}", goal.title, reduction),
        });
    }

    suggestions.truncate(settings.max_suggestions);
    suggestions
}

fn spread_suggestion(goals: &[ConflictGoal]) -> ConflictSuggestion {
    let description = if goals.len() > 1 {
        format!(
            "{} goals share this month; spreading their deadlines would ease cash flow",
            goals.len()
        )
    } else {
        "This month uses most of the projected savings; consider spacing out nearby deadlines"
            .to_string()
    };
    ConflictSuggestion {
        kind: SuggestionKind::SpreadDeadlines,
        goal_id: None,
        amount: None,
        months: None,
        description,
    }
}
