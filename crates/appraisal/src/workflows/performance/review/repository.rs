use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::domain::Criterion;
use super::super::report::summarize;
use super::super::report::views::{AppraisalSummary, ResultView, SnapshotView};
use super::super::scoring::{DecisionMatrix, RankedResult, ScoringOptions};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SnapshotId(pub String);

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One persisted engine run together with the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationSnapshot {
    pub id: SnapshotId,
    pub calculated_at: DateTime<Utc>,
    pub options: ScoringOptions,
    pub criteria: Vec<Criterion>,
    pub decision_matrix: DecisionMatrix,
    pub normalized_matrix: DecisionMatrix,
    pub results: Vec<RankedResult>,
}

impl CalculationSnapshot {
    pub fn summary(&self) -> AppraisalSummary {
        summarize(&self.results)
    }

    pub fn view(&self) -> SnapshotView {
        SnapshotView {
            id: self.id.0.clone(),
            calculated_at: self.calculated_at,
            options: self.options,
            criteria: self.criteria.clone(),
            summary: self.summary(),
            results: self.results.iter().map(ResultView::from).collect(),
        }
    }
}

/// Storage abstraction for calculation snapshots.
pub trait SnapshotStore: Send + Sync {
    fn insert(&self, snapshot: CalculationSnapshot) -> Result<CalculationSnapshot, StoreError>;
    fn latest(&self) -> Result<Option<CalculationSnapshot>, StoreError>;
    /// Most recent first.
    fn history(&self, limit: usize) -> Result<Vec<CalculationSnapshot>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("snapshot already exists")]
    Conflict,
    #[error("snapshot not found")]
    NotFound,
    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),
}
