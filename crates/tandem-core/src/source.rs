//! Goal sources - where the engine's input comes from
//!
//! The engine never fetches anything itself. A `GoalSource` is the data-access
//! layer that produces the complete goal list (contributions included) before
//! an analysis runs.
//!
//! - `InMemoryGoalSource` serves a fixed list (tests, request bodies)
//! - `JsonFileGoalSource` reads a goals document from disk on every load

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Goal, GoalsDocument};

/// Trait for goal providers
#[async_trait]
pub trait GoalSource: Send + Sync {
    /// Human-readable name for this source
    fn name(&self) -> &str;

    /// Load every goal with its full contribution history
    async fn load_goals(&self) -> Result<Vec<Goal>>;
}

/// A fixed, in-memory goal list
#[derive(Debug, Clone, Default)]
pub struct InMemoryGoalSource {
    goals: Vec<Goal>,
}

impl InMemoryGoalSource {
    pub fn new(goals: Vec<Goal>) -> Self {
        Self { goals }
    }
}

#[async_trait]
impl GoalSource for InMemoryGoalSource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load_goals(&self) -> Result<Vec<Goal>> {
        Ok(self.goals.clone())
    }
}

/// Goals document on the local filesystem
#[derive(Debug, Clone)]
pub struct JsonFileGoalSource {
    path: PathBuf,
}

impl JsonFileGoalSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl GoalSource for JsonFileGoalSource {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn load_goals(&self) -> Result<Vec<Goal>> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            Error::Source(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let goals = parse_goals(&content)?;
        debug!(path = %self.path.display(), goals = goals.len(), "Loaded goals");
        Ok(goals)
    }
}

/// Parse a goals document (bare array or `{ "goals": [...] }`)
pub fn parse_goals(content: &str) -> Result<Vec<Goal>> {
    let document: GoalsDocument = serde_json::from_str(content).map_err(|e| {
        Error::InvalidData(format!("Expected a goal array or {{\"goals\": [...]}}: {}", e))
    })?;
    let goals = document.into_goals();

    let untitled = goals.iter().filter(|g| g.id.is_empty()).count();
    if untitled > 0 {
        warn!(count = untitled, "Goals without an id");
    }

    Ok(goals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_in_memory_source() {
        let source = InMemoryGoalSource::new(vec![Goal::new("a", "Trip", 500.0)]);
        let goals = source.load_goals().await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(source.name(), "memory");
    }

    #[tokio::test]
    async fn test_json_file_source_reads_wrapped_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"goals": [{{"id": "g1", "title": "Car", "target_amount": "8000",
                "target_date": "2027-03-01T00:00:00Z",
                "contributions": [{{"amount": 250, "date": "2026-01-05"}}]}}]}}"#
        )
        .unwrap();

        let source = JsonFileGoalSource::new(file.path());
        let goals = source.load_goals().await.unwrap();

        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].target_amount, 8000.0);
        assert_eq!(
            goals[0].target_date,
            chrono::NaiveDate::from_ymd_opt(2027, 3, 1)
        );
        assert_eq!(goals[0].contributions[0].amount, 250.0);
    }

    #[tokio::test]
    async fn test_json_file_source_missing_file() {
        let source = JsonFileGoalSource::new("/nonexistent/goals.json");
        let err = source.load_goals().await.unwrap_err();
        assert!(matches!(err, Error::Source(_)));
    }

    #[test]
    fn test_parse_goals_bare_array() {
        let goals = parse_goals(r#"[{"id": "a", "target_amount": 100}]"#).unwrap();
        assert_eq!(goals[0].id, "a");
    }

    #[test]
    fn test_parse_goals_rejects_non_array() {
        let err = parse_goals(r#""not goals""#).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }
}
