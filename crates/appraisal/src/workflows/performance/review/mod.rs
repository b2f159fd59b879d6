//! Appraisal calculation service: input validation, snapshot persistence and HTTP routes.

pub mod guard;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use guard::{InputGuard, InputViolation};
pub use repository::{CalculationSnapshot, SnapshotId, SnapshotStore, StoreError};
pub use router::appraisal_router;
pub use service::{AppraisalRequest, AppraisalService, AppraisalServiceError};
