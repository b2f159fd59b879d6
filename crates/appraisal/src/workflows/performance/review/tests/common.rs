use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::performance::domain::{Criterion, CriterionKey, EvaluationRecord};
use crate::workflows::performance::review::repository::{
    CalculationSnapshot, SnapshotStore, StoreError,
};
use crate::workflows::performance::review::service::{AppraisalRequest, AppraisalService};
use crate::workflows::performance::review::appraisal_router;
use crate::workflows::performance::scoring::ScoringOptions;
use crate::workflows::performance::CriteriaCatalog;

pub(super) fn standard_criteria() -> Vec<Criterion> {
    CriteriaCatalog::standard().into_criteria()
}

/// Top marks everywhere, no deficiencies, an achievement and no warning letter.
pub(super) fn exemplary(id: &str, name: &str) -> EvaluationRecord {
    let mut record = EvaluationRecord::new(id, name);
    for key in CriterionKey::ordered() {
        if key.is_performance_rating() {
            record = record.with_value(key, 5.0);
        }
    }
    record.with_value(CriterionKey::AchievementFlag, 1.0)
}

pub(super) fn chronic_absentee(id: &str, name: &str) -> EvaluationRecord {
    exemplary(id, name).with_value(CriterionKey::AbsenceDays, 11.0)
}

pub(super) fn request() -> AppraisalRequest {
    AppraisalRequest {
        criteria: standard_criteria(),
        evaluations: vec![
            exemplary("E-100", "Dana Whitfield"),
            chronic_absentee("E-200", "Lee Park"),
        ],
        options: None,
    }
}

pub(super) fn build_service() -> (AppraisalService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = AppraisalService::new(store.clone(), ScoringOptions::default());
    (service, store)
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) snapshots: Arc<Mutex<Vec<CalculationSnapshot>>>,
}

impl SnapshotStore for MemoryStore {
    fn insert(&self, snapshot: CalculationSnapshot) -> Result<CalculationSnapshot, StoreError> {
        let mut guard = self.snapshots.lock().expect("store mutex poisoned");
        if guard.iter().any(|existing| existing.id == snapshot.id) {
            return Err(StoreError::Conflict);
        }
        guard.push(snapshot.clone());
        Ok(snapshot)
    }

    fn latest(&self) -> Result<Option<CalculationSnapshot>, StoreError> {
        let guard = self.snapshots.lock().expect("store mutex poisoned");
        Ok(guard.last().cloned())
    }

    fn history(&self, limit: usize) -> Result<Vec<CalculationSnapshot>, StoreError> {
        let guard = self.snapshots.lock().expect("store mutex poisoned");
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

pub(super) struct UnavailableStore;

impl SnapshotStore for UnavailableStore {
    fn insert(&self, _snapshot: CalculationSnapshot) -> Result<CalculationSnapshot, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn latest(&self) -> Result<Option<CalculationSnapshot>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn history(&self, _limit: usize) -> Result<Vec<CalculationSnapshot>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn appraisal_router_with_service(
    service: AppraisalService<MemoryStore>,
) -> axum::Router {
    appraisal_router(Arc::new(service))
}
