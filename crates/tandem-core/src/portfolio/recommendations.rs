//! Recommendation Generator
//!
//! Evaluates a fixed, ordered list of triggers against the portfolio:
//! 1. increase-capacity - the portfolio needs more per month than capacity
//! 2. focus-urgent - near-term goals fit capacity if funded first
//! 3. adjust-timeline - over capacity with flexible (MEDIUM/LOW) goals
//! 4. accelerate - comfortable headroom below capacity
//!
//! The result is truncated to the configured maximum.

use crate::config::RecommendationSettings;

use super::metrics::stable_sum;
use super::types::{GoalMetrics, Level, PortfolioTotals, Recommendation, RecommendationType};

/// Generate recommendations for a non-empty portfolio
pub fn generate(
    metrics: &[GoalMetrics],
    totals: &PortfolioTotals,
    capacity: f64,
    settings: &RecommendationSettings,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    let required = totals.monthly_required;

    if required > capacity {
        let increase = required - capacity;
        recommendations.push(Recommendation {
            kind: RecommendationType::IncreaseCapacity,
            title: "Increase monthly savings".to_string(),
            description: format!(
                "Your goals need {:.0}/month but you can save {:.0}/month. Finding another {:.0}/month would put the portfolio on track.",
                required, capacity, increase
            ),
            impact: Level::High,
            difficulty: if increase > capacity {
                Level::High
            } else {
                Level::Medium
            },
        });
    }

    let urgent: Vec<&GoalMetrics> = metrics
        .iter()
        .filter(|m| m.demand() > 0.0)
        .filter(|m| {
            m.days_until_deadline
                .is_some_and(|days| days < settings.urgent_within_days)
        })
        .collect();
    if !urgent.is_empty() {
        let urgent_remaining = stable_sum(urgent.iter().map(|m| m.demand()));
        let amortized = urgent_remaining / settings.urgent_amortization_months;
        if amortized <= capacity {
            recommendations.push(Recommendation {
                kind: RecommendationType::FocusUrgent,
                title: "Focus on urgent goals".to_string(),
                description: format!(
                    "{} goal{} due within a year need{} {:.0} in total. Funding {} first keeps them within your monthly capacity.",
                    urgent.len(),
                    if urgent.len() == 1 { "" } else { "s" },
                    if urgent.len() == 1 { "s" } else { "" },
                    urgent_remaining,
                    if urgent.len() == 1 { "it" } else { "them" },
                ),
                impact: Level::High,
                difficulty: Level::Low,
            });
        }
    }

    if required > capacity {
        let flexible = metrics
            .iter()
            .filter(|m| m.demand() > 0.0 && m.priority.is_flexible())
            .count();
        if flexible > 0 {
            recommendations.push(Recommendation {
                kind: RecommendationType::AdjustTimeline,
                title: "Adjust goal timelines".to_string(),
                description: format!(
                    "{} goal{} with later deadlines could move out to ease the monthly requirement.",
                    flexible,
                    if flexible == 1 { "" } else { "s" }
                ),
                impact: Level::Medium,
                difficulty: Level::Low,
            });
        }
    }

    if required < capacity * settings.accelerate_ratio {
        recommendations.push(Recommendation {
            kind: RecommendationType::Accelerate,
            title: "Accelerate your goals".to_string(),
            description: format!(
                "You have about {:.0}/month of headroom. Putting it toward your goals would reach them sooner.",
                capacity - required
            ),
            impact: Level::Medium,
            difficulty: Level::Low,
        });
    }

    recommendations.truncate(settings.max);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::Goal;
    use crate::portfolio::aggregator::aggregate;
    use crate::portfolio::metrics::calculate_goal_metrics;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn recommend(goals: &[Goal], now: NaiveDate, capacity: f64) -> Vec<Recommendation> {
        let config = EngineConfig::default();
        let metrics: Vec<_> = goals
            .iter()
            .map(|g| calculate_goal_metrics(g, now, capacity, &config))
            .collect();
        let totals = aggregate(&metrics, capacity);
        generate(&metrics, &totals, capacity, &config.recommendations)
    }

    fn kinds(recs: &[Recommendation]) -> Vec<RecommendationType> {
        recs.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn test_over_capacity_triggers() {
        let now = date(2026, 1, 1);
        let goals = vec![
            // 60 days -> 2 months
            Goal::new("soon", "Deposit", 6000.0).with_target_date(date(2026, 3, 2)),
            // 400 days, LOW priority
            Goal::new("later", "Car", 12000.0).with_target_date(date(2027, 2, 5)),
        ];

        // Portfolio requires 18000 / 2 = 9000 against 400; the urgent
        // deposit alone needs 6000 / 12 = 500, above capacity
        let recs = recommend(&goals, now, 400.0);

        assert_eq!(
            kinds(&recs),
            vec![
                RecommendationType::IncreaseCapacity,
                RecommendationType::AdjustTimeline
            ]
        );
        assert_eq!(recs[0].difficulty, Level::High);
    }

    #[test]
    fn test_increase_difficulty_medium_when_gap_small() {
        let now = date(2026, 1, 1);
        let goals = vec![Goal::new("a", "Trip", 7200.0).with_target_date(date(2026, 6, 30))];

        // 1200/month required against 1000
        let recs = recommend(&goals, now, 1000.0);

        assert_eq!(recs[0].kind, RecommendationType::IncreaseCapacity);
        assert_eq!(recs[0].difficulty, Level::Medium);
    }

    #[test]
    fn test_focus_urgent_and_accelerate() {
        let now = date(2026, 1, 1);
        let goals = vec![Goal::new("a", "Wedding", 6000.0).with_target_date(date(2026, 12, 27))];

        // 360 days -> 12 months, 500/month against 2000
        let recs = recommend(&goals, now, 2000.0);

        assert_eq!(
            kinds(&recs),
            vec![RecommendationType::FocusUrgent, RecommendationType::Accelerate]
        );
    }

    #[test]
    fn test_accelerate_boundary() {
        let now = date(2026, 1, 1);
        // 180 days -> 6 months, 700/month
        let goals = vec![Goal::new("a", "Bike", 4200.0).with_target_date(date(2026, 6, 30))];

        // exactly 0.7 x capacity: not strictly below
        let at_boundary = recommend(&goals, now, 1000.0);
        assert!(!kinds(&at_boundary).contains(&RecommendationType::Accelerate));

        let above = recommend(&goals, now, 1001.0);
        assert!(kinds(&above).contains(&RecommendationType::Accelerate));
    }

    #[test]
    fn test_truncated_to_max() {
        let now = date(2026, 1, 1);
        let goals = vec![Goal::new("a", "Wedding", 6000.0).with_target_date(date(2026, 12, 27))];
        let config = EngineConfig::default();
        let metrics: Vec<_> = goals
            .iter()
            .map(|g| calculate_goal_metrics(g, now, 2000.0, &config))
            .collect();
        let totals = aggregate(&metrics, 2000.0);
        let settings = RecommendationSettings {
            max: 1,
            ..config.recommendations.clone()
        };

        let recs = generate(&metrics, &totals, 2000.0, &settings);

        assert_eq!(kinds(&recs), vec![RecommendationType::FocusUrgent]);
    }

    #[test]
    fn test_complete_goals_are_not_urgent() {
        let now = date(2026, 1, 1);
        let goals = vec![Goal::new("a", "Ring", 1000.0)
            .with_target_date(date(2026, 3, 1))
            .with_contribution(1000.0, date(2025, 12, 1))];

        let recs = recommend(&goals, now, 500.0);

        assert_eq!(kinds(&recs), vec![RecommendationType::Accelerate]);
    }
}
