use std::sync::Arc;

use super::common::*;
use crate::workflows::performance::domain::Criterion;
use crate::workflows::performance::review::guard::InputViolation;
use crate::workflows::performance::review::repository::{SnapshotStore, StoreError};
use crate::workflows::performance::review::service::{AppraisalService, AppraisalServiceError};
use crate::workflows::performance::scoring::{
    PerformanceRule, Rank, Recommendation, ScoringOptions, PROMOTION_NOTE,
};
use crate::workflows::performance::CriterionKey;

#[test]
fn calculate_stores_a_timestamped_snapshot() {
    let (service, store) = build_service();

    let snapshot = service.calculate(request()).expect("calculation succeeds");

    assert!(snapshot.id.0.starts_with("calc-"));
    assert_eq!(snapshot.criteria.len(), 13);
    assert_eq!(snapshot.decision_matrix.rows.len(), 2);
    assert_eq!(snapshot.normalized_matrix.criteria.len(), 13);

    let top = &snapshot.results[0];
    assert_eq!(top.employee_id.0, "E-100");
    assert_eq!(top.rank, Rank::Position(1));
    assert!((top.final_score - 1.0).abs() < 1e-9);
    assert_eq!(top.note.as_deref(), Some(PROMOTION_NOTE));

    let absent = &snapshot.results[1];
    assert_eq!(absent.rank, Rank::Overridden);
    assert_eq!(absent.recommendation, Recommendation::Terminated);

    let stored = store.latest().expect("store readable").expect("snapshot stored");
    assert_eq!(stored.id, snapshot.id);
}

#[test]
fn preview_does_not_touch_the_store() {
    let (service, store) = build_service();

    let computation = service.preview(&request()).expect("preview succeeds");

    assert_eq!(computation.results.len(), 2);
    assert!(store.history(10).expect("history").is_empty());
}

#[test]
fn request_options_override_service_defaults() {
    let (service, _) = build_service();
    let mut request = request();
    request.options = Some(ScoringOptions {
        performance_rule: PerformanceRule::ColumnMax,
        ..ScoringOptions::default()
    });

    let snapshot = service.calculate(request).expect("calculation succeeds");

    assert_eq!(snapshot.options.performance_rule, PerformanceRule::ColumnMax);
    assert_eq!(service.options().performance_rule, PerformanceRule::OverFive);
}

#[test]
fn calculate_propagates_input_violations() {
    let (service, store) = build_service();
    let mut request = request();
    request
        .criteria
        .push(Criterion::standard(CriterionKey::Quality, 5.0));

    match service.calculate(request) {
        Err(AppraisalServiceError::Input(InputViolation::DuplicateCriterion(
            CriterionKey::Quality,
        ))) => {}
        other => panic!("expected input violation, got {other:?}"),
    }
    assert!(store.latest().expect("readable").is_none());
}

#[test]
fn latest_reports_not_found_before_any_calculation() {
    let (service, _) = build_service();

    match service.latest() {
        Err(AppraisalServiceError::Store(StoreError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn history_returns_newest_first() {
    let (service, _) = build_service();
    let first = service.calculate(request()).expect("first");
    let second = service.calculate(request()).expect("second");

    let history = service.history(5).expect("history");

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, second.id);
    assert_eq!(history[1].id, first.id);
    assert_eq!(service.latest().expect("latest").id, second.id);
}

#[test]
fn store_failures_surface_as_store_errors() {
    let service = AppraisalService::new(Arc::new(UnavailableStore), ScoringOptions::default());

    assert!(matches!(
        service.calculate(request()),
        Err(AppraisalServiceError::Store(StoreError::Unavailable(_)))
    ));
}
