use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::super::criteria::category_drift;
use super::super::domain::{Criterion, EvaluationRecord};
use super::super::scoring::{SawComputation, SawEngine, ScoringOptions};
use super::guard::{InputGuard, InputViolation};
use super::repository::{CalculationSnapshot, SnapshotId, SnapshotStore, StoreError};

/// Payload accepted by the calculate and preview operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppraisalRequest {
    pub criteria: Vec<Criterion>,
    pub evaluations: Vec<EvaluationRecord>,
    /// Overrides the service defaults for this run only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ScoringOptions>,
}

/// Service composing the input guard, scoring engine and snapshot store.
pub struct AppraisalService<S> {
    guard: Arc<InputGuard>,
    store: Arc<S>,
    options: ScoringOptions,
}

static SNAPSHOT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_snapshot_id() -> SnapshotId {
    let id = SNAPSHOT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SnapshotId(format!("calc-{id:06}"))
}

impl<S> AppraisalService<S>
where
    S: SnapshotStore + 'static,
{
    pub fn new(store: Arc<S>, options: ScoringOptions) -> Self {
        Self::with_guard(InputGuard::default(), store, options)
    }

    pub fn with_guard(guard: InputGuard, store: Arc<S>, options: ScoringOptions) -> Self {
        Self {
            guard: Arc::new(guard),
            store,
            options,
        }
    }

    pub fn options(&self) -> &ScoringOptions {
        &self.options
    }

    /// Run the engine without persisting anything.
    pub fn preview(
        &self,
        request: &AppraisalRequest,
    ) -> Result<SawComputation, AppraisalServiceError> {
        let (_, computation) = self.run(request)?;
        Ok(computation)
    }

    /// Run the engine and store the outcome as a timestamped snapshot.
    pub fn calculate(
        &self,
        request: AppraisalRequest,
    ) -> Result<CalculationSnapshot, AppraisalServiceError> {
        let (options, computation) = self.run(&request)?;

        let snapshot = CalculationSnapshot {
            id: next_snapshot_id(),
            calculated_at: Utc::now(),
            options,
            criteria: request.criteria,
            decision_matrix: computation.decision_matrix,
            normalized_matrix: computation.normalized_matrix,
            results: computation.results,
        };

        let stored = self.store.insert(snapshot)?;
        info!(
            snapshot = %stored.id,
            employees = stored.results.len(),
            "stored appraisal calculation"
        );
        Ok(stored)
    }

    pub fn latest(&self) -> Result<CalculationSnapshot, AppraisalServiceError> {
        let snapshot = self.store.latest()?.ok_or(StoreError::NotFound)?;
        Ok(snapshot)
    }

    pub fn history(&self, limit: usize) -> Result<Vec<CalculationSnapshot>, AppraisalServiceError> {
        Ok(self.store.history(limit)?)
    }

    fn run(
        &self,
        request: &AppraisalRequest,
    ) -> Result<(ScoringOptions, SawComputation), AppraisalServiceError> {
        self.guard.check(&request.criteria, &request.evaluations)?;

        for drift in category_drift(&request.criteria) {
            warn!(
                category = drift.category.label(),
                expected = drift.expected,
                actual = drift.actual,
                "category weights drift from target"
            );
        }

        let options = request.options.unwrap_or(self.options);
        let engine = SawEngine::from_criteria(&request.criteria, options);
        Ok((options, engine.compute(&request.evaluations)))
    }
}

/// Error raised by the appraisal service.
#[derive(Debug, thiserror::Error)]
pub enum AppraisalServiceError {
    #[error(transparent)]
    Input(#[from] InputViolation),
    #[error(transparent)]
    Store(#[from] StoreError),
}
