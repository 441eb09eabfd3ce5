//! Portfolio service - goal source plus engine
//!
//! Fetching and recomputing are separate decisions. `FetchPolicy::Refresh`
//! reloads goals from the source before analyzing; `FetchPolicy::Reuse`
//! recomputes from the goals fetched last time, which is what a capacity edit
//! with no data change needs. The fetched goal snapshot is the only state
//! kept here; analysis results are never cached.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Goal;
use crate::portfolio::{PortfolioAnalysis, PortfolioEngine};
use crate::source::GoalSource;

/// Whether to reload goals before an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Always reload from the source
    #[default]
    Refresh,
    /// Reuse the last fetched goals; fetches when nothing was loaded yet
    Reuse,
}

impl FetchPolicy {
    pub fn from_refresh(refresh: bool) -> Self {
        if refresh {
            Self::Refresh
        } else {
            Self::Reuse
        }
    }
}

pub struct PortfolioService {
    source: Arc<dyn GoalSource>,
    engine: PortfolioEngine,
    snapshot: Mutex<Option<Arc<Vec<Goal>>>>,
}

impl PortfolioService {
    pub fn new(source: Arc<dyn GoalSource>, engine: PortfolioEngine) -> Self {
        Self {
            source,
            engine,
            snapshot: Mutex::new(None),
        }
    }

    pub fn engine(&self) -> &PortfolioEngine {
        &self.engine
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Analyze the source's goals under the given fetch policy
    pub async fn analyze(
        &self,
        capacity: f64,
        now: NaiveDate,
        policy: FetchPolicy,
    ) -> Result<PortfolioAnalysis> {
        let goals = self.goals(policy).await?;
        self.engine.analyze(&goals, capacity, now)
    }

    /// Goals per the fetch policy
    pub async fn goals(&self, policy: FetchPolicy) -> Result<Arc<Vec<Goal>>> {
        if policy == FetchPolicy::Reuse {
            if let Some(goals) = self.cached()? {
                debug!(goals = goals.len(), "Reusing goal snapshot");
                return Ok(goals);
            }
        }
        self.refresh().await
    }

    /// Reload goals from the source and replace the snapshot
    pub async fn refresh(&self) -> Result<Arc<Vec<Goal>>> {
        let goals = Arc::new(self.source.load_goals().await?);
        debug!(
            source = self.source.name(),
            goals = goals.len(),
            "Fetched goals"
        );

        let mut snapshot = self.lock()?;
        *snapshot = Some(Arc::clone(&goals));
        Ok(goals)
    }

    fn cached(&self) -> Result<Option<Arc<Vec<Goal>>>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Arc<Vec<Goal>>>>> {
        self.snapshot
            .lock()
            .map_err(|_| Error::Source("goal snapshot lock poisoned".to_string()))
    }
}
