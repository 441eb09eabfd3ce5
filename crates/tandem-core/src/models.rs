//! Domain models for Tandem
//!
//! Goals arrive from an external data-access layer, so decoding is lenient:
//! a malformed amount or date is normalized (0 / absent) instead of failing
//! the whole document.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A financial goal (milestone) with its contribution history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Amount to reach; negative or non-numeric input is read as 0
    #[serde(default, deserialize_with = "lenient_target_amount")]
    pub target_amount: f64,
    /// Deadline; absent or unparseable dates are `None`
    #[serde(default, deserialize_with = "lenient_date")]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub contributions: Vec<Contribution>,
}

impl Goal {
    pub fn new(id: impl Into<String>, title: impl Into<String>, target_amount: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            target_amount: normalize_target(target_amount),
            target_date: None,
            contributions: Vec::new(),
        }
    }

    pub fn with_target_date(mut self, date: NaiveDate) -> Self {
        self.target_date = Some(date);
        self
    }

    pub fn with_contribution(mut self, amount: f64, date: NaiveDate) -> Self {
        self.contributions.push(Contribution {
            amount: finite_or_zero(amount),
            date: Some(date),
            category: None,
        });
        self
    }

    /// Non-financial goals (no positive target) are left out of the portfolio
    pub fn is_financial(&self) -> bool {
        self.target_amount > 0.0
    }
}

/// A dated amount applied toward a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Summed as-is, including zero or negative corrections
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A goals document: either a bare array or `{ "goals": [...] }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GoalsDocument {
    List(Vec<Goal>),
    Wrapped { goals: Vec<Goal> },
}

impl GoalsDocument {
    pub fn into_goals(self) -> Vec<Goal> {
        match self {
            Self::List(goals) | Self::Wrapped { goals } => goals,
        }
    }
}

/// Affordability status of a single goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    Complete,
    /// Nothing to plan monthly: no deadline, or nothing left to save
    NoDeadline,
    OnTrack,
    Achievable,
    Challenging,
    Unrealistic,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::NoDeadline => "no-deadline",
            Self::OnTrack => "on-track",
            Self::Achievable => "achievable",
            Self::Challenging => "challenging",
            Self::Unrealistic => "unrealistic",
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "complete" => Ok(Self::Complete),
            "no-deadline" | "no_deadline" => Ok(Self::NoDeadline),
            "on-track" | "on_track" => Ok(Self::OnTrack),
            "achievable" => Ok(Self::Achievable),
            "challenging" => Ok(Self::Challenging),
            "unrealistic" => Ok(Self::Unrealistic),
            _ => Err(format!("Unknown goal status: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deadline-driven priority of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalPriority {
    High,
    Medium,
    Low,
}

impl GoalPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Medium and low priority goals can have their deadlines moved
    pub fn is_flexible(&self) -> bool {
        !matches!(self, Self::High)
    }
}

impl std::str::FromStr for GoalPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Unknown goal priority: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a date from `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn normalize_target(value: f64) -> f64 {
    finite_or_zero(value).max(0.0)
}

fn amount_from_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) => finite_or_zero(v),
        None => {
            tracing::debug!(value = %value, "Non-numeric amount treated as 0");
            0.0
        }
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(amount_from_value).unwrap_or(0.0))
}

fn lenient_target_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_amount(deserializer).map(normalize_target)
}

fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => {
            let date = parse_date(&s);
            if date.is_none() {
                tracing::debug!(value = %s, "Unparseable date ignored");
            }
            date
        }
        Some(Value::Null) | None => None,
        Some(other) => {
            tracing::debug!(value = %other, "Non-string date ignored");
            None
        }
    })
}

fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
