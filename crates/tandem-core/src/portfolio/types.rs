//! Output types of the portfolio engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::FundingModel;
use crate::models::{GoalPriority, GoalStatus};

/// Derived figures for one goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalMetrics {
    pub goal_id: String,
    pub title: String,
    pub target_amount: f64,
    pub target_date: Option<NaiveDate>,
    /// Sum of contributions, floored at 0
    pub total_saved: f64,
    /// Negative when overfunded
    pub remaining: f64,
    pub percentage_saved: f64,
    /// Signed: negative for overdue goals
    pub days_until_deadline: Option<i64>,
    /// Always >= 1 when a deadline is set
    pub months_until_deadline: Option<u32>,
    pub monthly_required: f64,
    pub status: GoalStatus,
    pub priority: GoalPriority,
    pub contribution_count: usize,
    pub last_contribution_date: Option<NaiveDate>,
}

impl GoalMetrics {
    /// Remaining amount as downstream demand (overfunding counts as 0)
    pub fn demand(&self) -> f64 {
        self.remaining.max(0.0)
    }
}

/// Portfolio-wide totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PortfolioTotals {
    pub goal_count: usize,
    pub total_budget_needed: f64,
    pub total_saved: f64,
    pub total_remaining: f64,
    pub percentage_saved: f64,
    pub soonest_goal_id: Option<String>,
    pub soonest_deadline: Option<NaiveDate>,
    pub months_until_soonest: Option<u32>,
    pub monthly_required: f64,
    /// Positive when the requirement exceeds capacity
    pub monthly_gap: f64,
    pub is_realistic: bool,
}

/// Component scores behind the health score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HealthBreakdown {
    /// 0-40
    pub progress: f64,
    /// 0-30
    pub feasibility: f64,
    /// 0-20
    pub time_buffer: f64,
    /// 0-10
    pub distribution: f64,
    /// Rounded, clamped sum
    pub score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationType {
    IncreaseCapacity,
    FocusUrgent,
    AdjustTimeline,
    Accelerate,
}

impl RecommendationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IncreaseCapacity => "increase-capacity",
            Self::FocusUrgent => "focus-urgent",
            Self::AdjustTimeline => "adjust-timeline",
            Self::Accelerate => "accelerate",
        }
    }
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shared three-level scale for impact and difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A portfolio-level suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub title: String,
    pub description: String,
    pub impact: Level,
    pub difficulty: Level,
}

/// How far a month's demand exceeds projected cash
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictSeverity {
    Safe,
    Moderate,
    High,
    Critical,
}

impl ConflictSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for ConflictSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A goal contributing to a month's demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictGoal {
    pub goal_id: String,
    pub title: String,
    pub remaining: f64,
    pub target_date: NaiveDate,
    pub priority: GoalPriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionKind {
    DelayGoal,
    IncreaseSavings,
    ReduceTarget,
    SpreadDeadlines,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DelayGoal => "delay-goal",
            Self::IncreaseSavings => "increase-savings",
            Self::ReduceTarget => "reduce-target",
            Self::SpreadDeadlines => "spread-deadlines",
        }
    }
}

/// A remedy for one conflict month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictSuggestion {
    pub kind: SuggestionKind,
    pub goal_id: Option<String>,
    /// Monthly increase or target reduction, depending on `kind`
    pub amount: Option<f64>,
    /// Delay in months for `delay-goal`
    pub months: Option<u32>,
    pub description: String,
}

/// One calendar month of deadlines evaluated against projected cash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConflict {
    /// `YYYY-MM`
    pub key: String,
    pub year: i32,
    pub month: u32,
    pub goals: Vec<ConflictGoal>,
    pub total_needed: f64,
    pub months_until: u32,
    pub available_cash: f64,
    pub is_conflict: bool,
    pub shortage: f64,
    pub severity_ratio: f64,
    pub severity: ConflictSeverity,
    pub percentage_used: f64,
    pub suggestions: Vec<ConflictSuggestion>,
}

/// The complete, immutable result of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    /// True when no goal had a positive target amount
    pub is_empty: bool,
    pub analyzed_on: NaiveDate,
    pub capacity: f64,
    pub funding_model: FundingModel,
    /// Sorted by target date, undated goals last
    pub goals: Vec<GoalMetrics>,
    pub totals: PortfolioTotals,
    pub health_score: u8,
    pub health: HealthBreakdown,
    pub recommendations: Vec<Recommendation>,
    /// Chronological
    pub conflicts: Vec<TimelineConflict>,
}

impl PortfolioAnalysis {
    /// Result for a portfolio without any financial goal
    pub fn empty(capacity: f64, analyzed_on: NaiveDate, funding_model: FundingModel) -> Self {
        Self {
            is_empty: true,
            analyzed_on,
            capacity,
            funding_model,
            goals: Vec::new(),
            totals: PortfolioTotals {
                is_realistic: true,
                ..Default::default()
            },
            health_score: 0,
            health: HealthBreakdown::default(),
            recommendations: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    /// Months whose demand actually exceeds projected cash
    pub fn strict_conflicts(&self) -> impl Iterator<Item = &TimelineConflict> {
        self.conflicts.iter().filter(|c| c.is_conflict)
    }

    pub fn critical_conflicts(&self) -> impl Iterator<Item = &TimelineConflict> {
        self.conflicts
            .iter()
            .filter(|c| c.severity == ConflictSeverity::Critical)
    }

    /// Total shortage across all conflict months
    pub fn conflict_shortage(&self) -> f64 {
        self.conflicts.iter().map(|c| c.shortage).sum()
    }

    pub fn goal(&self, goal_id: &str) -> Option<&GoalMetrics> {
        self.goals.iter().find(|g| g.goal_id == goal_id)
    }
}
