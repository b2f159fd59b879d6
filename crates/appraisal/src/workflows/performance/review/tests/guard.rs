use super::common::*;
use crate::workflows::performance::domain::{Criterion, CriterionKey, EmployeeId, EvaluationRecord};
use crate::workflows::performance::review::guard::{InputGuard, InputViolation};

#[test]
fn well_formed_input_passes() {
    let request = request();
    InputGuard::new()
        .check(&request.criteria, &request.evaluations)
        .expect("valid input");
}

#[test]
fn rejects_duplicate_criteria() {
    let mut criteria = standard_criteria();
    criteria.push(Criterion::standard(CriterionKey::Quality, 0.0));

    assert_eq!(
        InputGuard::new().check_criteria(&criteria),
        Err(InputViolation::DuplicateCriterion(CriterionKey::Quality))
    );
}

#[test]
fn rejects_negative_and_non_finite_weights() {
    let guard = InputGuard::new();
    let negative = [Criterion::standard(CriterionKey::SickDays, -1.0)];
    let infinite = [Criterion::standard(CriterionKey::SickDays, f64::INFINITY)];

    assert!(matches!(
        guard.check_criteria(&negative),
        Err(InputViolation::InvalidWeight { key: CriterionKey::SickDays, .. })
    ));
    assert!(matches!(
        guard.check_criteria(&infinite),
        Err(InputViolation::InvalidWeight { .. })
    ));
}

#[test]
fn rejects_blank_and_duplicate_employee_ids() {
    let guard = InputGuard::new();

    let blank = [exemplary("E-1", "Ari"), EvaluationRecord::new("  ", "Nobody")];
    assert_eq!(
        guard.check_evaluations(&blank),
        Err(InputViolation::MissingEmployeeId { position: 2 })
    );

    let duplicated = [exemplary("E-1", "Ari"), exemplary("E-1", "Ari again")];
    assert_eq!(
        guard.check_evaluations(&duplicated),
        Err(InputViolation::DuplicateEmployee(EmployeeId("E-1".to_string())))
    );
}

#[test]
fn rejects_non_finite_raw_values() {
    let records =
        [EvaluationRecord::new("E-1", "Ari").with_value(CriterionKey::LatenessCount, f64::NAN)];

    assert!(matches!(
        InputGuard::new().check_evaluations(&records),
        Err(InputViolation::NonFiniteValue { key: CriterionKey::LatenessCount, .. })
    ));
}
