use appraisal::workflows::performance::review::{CalculationSnapshot, SnapshotStore, StoreError};
use appraisal::workflows::performance::{AttendanceRule, PerformanceRule};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local snapshot history, oldest first.
#[derive(Default, Clone)]
pub(crate) struct InMemorySnapshotStore {
    snapshots: Arc<Mutex<Vec<CalculationSnapshot>>>,
}

impl InMemorySnapshotStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<CalculationSnapshot>>, StoreError> {
        self.snapshots
            .lock()
            .map_err(|_| StoreError::Unavailable("snapshot store mutex poisoned".to_string()))
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn insert(&self, snapshot: CalculationSnapshot) -> Result<CalculationSnapshot, StoreError> {
        let mut guard = self.lock()?;
        if guard.iter().any(|existing| existing.id == snapshot.id) {
            return Err(StoreError::Conflict);
        }
        guard.push(snapshot.clone());
        Ok(snapshot)
    }

    fn latest(&self) -> Result<Option<CalculationSnapshot>, StoreError> {
        Ok(self.lock()?.last().cloned())
    }

    fn history(&self, limit: usize) -> Result<Vec<CalculationSnapshot>, StoreError> {
        Ok(self.lock()?.iter().rev().take(limit).cloned().collect())
    }
}

pub(crate) fn parse_performance_rule(raw: &str) -> Result<PerformanceRule, String> {
    PerformanceRule::parse(raw).ok_or_else(|| {
        format!("unknown performance rule '{raw}' (expected over_five or column_max)")
    })
}

pub(crate) fn parse_attendance_rule(raw: &str) -> Result<AttendanceRule, String> {
    AttendanceRule::parse(raw).ok_or_else(|| {
        format!("unknown attendance rule '{raw}' (expected any_occurrence or min_over_value)")
    })
}
