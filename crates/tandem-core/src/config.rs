//! Engine configuration
//!
//! Every threshold the portfolio engine applies lives here so that a deployment
//! can tune the heuristics without a rebuild.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a layered resolution:
//! 1. An explicit path (`--config`), which must exist
//! 2. Override in data dir (~/.local/share/tandem/config/engine.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Override files may be partial; keys they leave out keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

/// How money that is already saved is credited when projecting a month's cash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FundingModel {
    /// All current savings form one fungible pool available to every deadline
    #[default]
    SharedPool,
    /// Savings stay with their own goal; months only draw on future accrual
    /// not already claimed by earlier deadlines
    Earmarked,
}

impl FundingModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SharedPool => "shared_pool",
            Self::Earmarked => "earmarked",
        }
    }
}

impl std::str::FromStr for FundingModel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "shared_pool" | "shared" => Ok(Self::SharedPool),
            "earmarked" => Ok(Self::Earmarked),
            _ => Err(format!(
                "Unknown funding model: {}. Available: shared-pool, earmarked",
                s
            )),
        }
    }
}

impl std::fmt::Display for FundingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Thresholds for per-goal status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusThresholds {
    pub on_track_ratio: f64,
    pub challenging_ratio: f64,
    pub days_per_month: i64,
}

/// Day windows for deadline-driven priority
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityWindows {
    pub high_within_days: i64,
    pub medium_within_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSettings {
    pub undated_goal_months: f64,
    pub buffer_horizon_months: f64,
    pub distribution_threshold_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationSettings {
    pub max: usize,
    pub urgent_within_days: i64,
    pub urgent_amortization_months: f64,
    pub accelerate_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictSettings {
    pub funding_model: FundingModel,
    pub delay_buffer_months: u32,
    pub trim_ratio: f64,
    pub max_suggestions: usize,
    pub utilization_threshold_pct: f64,
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineConfig {
    pub status: StatusThresholds,
    pub priority: PriorityWindows,
    pub health: HealthSettings,
    pub recommendations: RecommendationSettings,
    pub conflicts: ConflictSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            status: StatusThresholds {
                on_track_ratio: 0.3,
                challenging_ratio: 1.5,
                days_per_month: 30,
            },
            priority: PriorityWindows {
                high_within_days: 180,
                medium_within_days: 365,
            },
            health: HealthSettings {
                undated_goal_months: 12.0,
                buffer_horizon_months: 24.0,
                distribution_threshold_pct: 50.0,
            },
            recommendations: RecommendationSettings {
                max: 3,
                urgent_within_days: 365,
                urgent_amortization_months: 12.0,
                accelerate_ratio: 0.7,
            },
            conflicts: ConflictSettings {
                funding_model: FundingModel::SharedPool,
                delay_buffer_months: 3,
                trim_ratio: 0.2,
                max_suggestions: 2,
                utilization_threshold_pct: 50.0,
            },
        }
    }
}

impl EngineConfig {
    /// Load configuration (explicit path, then data dir override, then default)
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        match resolve_config_path(override_path)? {
            Some(path) => {
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                tracing::debug!(path = %path.display(), "Loaded engine config override");
                parse_config(&content)
            }
            None => parse_config(DEFAULT_CONFIG),
        }
    }

    /// Same config with a different funding model
    pub fn with_funding_model(mut self, model: FundingModel) -> Self {
        self.conflicts.funding_model = model;
        self
    }

    fn validate(&self) -> Result<()> {
        let ratios = [
            ("status.on_track_ratio", self.status.on_track_ratio),
            ("status.challenging_ratio", self.status.challenging_ratio),
            ("health.undated_goal_months", self.health.undated_goal_months),
            (
                "health.buffer_horizon_months",
                self.health.buffer_horizon_months,
            ),
            (
                "recommendations.urgent_amortization_months",
                self.recommendations.urgent_amortization_months,
            ),
            (
                "recommendations.accelerate_ratio",
                self.recommendations.accelerate_ratio,
            ),
        ];
        for (key, value) in ratios {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a positive number, got {}",
                    key, value
                )));
            }
        }

        if self.status.on_track_ratio > self.status.challenging_ratio {
            return Err(Error::Config(
                "status.on_track_ratio must not exceed status.challenging_ratio".to_string(),
            ));
        }
        if self.status.days_per_month <= 0 {
            return Err(Error::Config(
                "status.days_per_month must be positive".to_string(),
            ));
        }
        if self.priority.high_within_days > self.priority.medium_within_days {
            return Err(Error::Config(
                "priority.high_within_days must not exceed priority.medium_within_days"
                    .to_string(),
            ));
        }
        let percentages = [
            (
                "health.distribution_threshold_pct",
                self.health.distribution_threshold_pct,
            ),
            (
                "conflicts.utilization_threshold_pct",
                self.conflicts.utilization_threshold_pct,
            ),
        ];
        for (key, value) in percentages {
            if !(0.0..=100.0).contains(&value) {
                return Err(Error::Config(format!(
                    "{} must be between 0 and 100, got {}",
                    key, value
                )));
            }
        }
        if self.recommendations.max == 0 {
            return Err(Error::Config(
                "recommendations.max must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.conflicts.trim_ratio) {
            return Err(Error::Config(
                "conflicts.trim_ratio must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tandem").join("config").join("engine.toml"))
}

/// The file a load would read, or `None` when the embedded default applies
pub fn resolve_config_path(override_path: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = override_path {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    Ok(default_config_path().filter(|p| p.exists()))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    status: Option<RawStatus>,
    priority: Option<RawPriority>,
    health: Option<RawHealth>,
    recommendations: Option<RawRecommendations>,
    conflicts: Option<RawConflicts>,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    on_track_ratio: Option<f64>,
    challenging_ratio: Option<f64>,
    days_per_month: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawPriority {
    high_within_days: Option<i64>,
    medium_within_days: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawHealth {
    undated_goal_months: Option<f64>,
    buffer_horizon_months: Option<f64>,
    distribution_threshold_pct: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawRecommendations {
    max: Option<usize>,
    urgent_within_days: Option<i64>,
    urgent_amortization_months: Option<f64>,
    accelerate_ratio: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawConflicts {
    funding_model: Option<FundingModel>,
    delay_buffer_months: Option<u32>,
    trim_ratio: Option<f64>,
    max_suggestions: Option<usize>,
    utilization_threshold_pct: Option<f64>,
}

/// Parse config from TOML content, layering it over the defaults
pub fn parse_config(content: &str) -> Result<EngineConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = EngineConfig::default();

    if let Some(status) = raw.status {
        if let Some(v) = status.on_track_ratio {
            config.status.on_track_ratio = v;
        }
        if let Some(v) = status.challenging_ratio {
            config.status.challenging_ratio = v;
        }
        if let Some(v) = status.days_per_month {
            config.status.days_per_month = v;
        }
    }

    if let Some(priority) = raw.priority {
        if let Some(v) = priority.high_within_days {
            config.priority.high_within_days = v;
        }
        if let Some(v) = priority.medium_within_days {
            config.priority.medium_within_days = v;
        }
    }

    if let Some(health) = raw.health {
        if let Some(v) = health.undated_goal_months {
            config.health.undated_goal_months = v;
        }
        if let Some(v) = health.buffer_horizon_months {
            config.health.buffer_horizon_months = v;
        }
        if let Some(v) = health.distribution_threshold_pct {
            config.health.distribution_threshold_pct = v;
        }
    }

    if let Some(recs) = raw.recommendations {
        if let Some(v) = recs.max {
            config.recommendations.max = v;
        }
        if let Some(v) = recs.urgent_within_days {
            config.recommendations.urgent_within_days = v;
        }
        if let Some(v) = recs.urgent_amortization_months {
            config.recommendations.urgent_amortization_months = v;
        }
        if let Some(v) = recs.accelerate_ratio {
            config.recommendations.accelerate_ratio = v;
        }
    }

    if let Some(conflicts) = raw.conflicts {
        if let Some(v) = conflicts.funding_model {
            config.conflicts.funding_model = v;
        }
        if let Some(v) = conflicts.delay_buffer_months {
            config.conflicts.delay_buffer_months = v;
        }
        if let Some(v) = conflicts.trim_ratio {
            config.conflicts.trim_ratio = v;
        }
        if let Some(v) = conflicts.max_suggestions {
            config.conflicts.max_suggestions = v;
        }
        if let Some(v) = conflicts.utilization_threshold_pct {
            config.conflicts.utilization_threshold_pct = v;
        }
    }

    config.validate()?;
    Ok(config)
}
