use std::collections::BTreeSet;

use super::super::domain::{Criterion, CriterionKey, EmployeeId, EvaluationRecord};

/// Validation errors raised before the scoring engine runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputViolation {
    #[error("criterion {0} is listed more than once")]
    DuplicateCriterion(CriterionKey),
    #[error("criterion {key} has invalid weight {weight} (expected a finite value in 0..=100)")]
    InvalidWeight { key: CriterionKey, weight: f64 },
    #[error("evaluation #{position} has no employee id")]
    MissingEmployeeId { position: usize },
    #[error("employee {0} is evaluated more than once")]
    DuplicateEmployee(EmployeeId),
    #[error("employee {employee_id} has a non-finite value for {key}")]
    NonFiniteValue {
        employee_id: EmployeeId,
        key: CriterionKey,
    },
}

const MAX_WEIGHT: f64 = 100.0;

/// Caller-side precondition checks for criteria tables and evaluation rows.
#[derive(Debug, Clone, Default)]
pub struct InputGuard;

impl InputGuard {
    pub fn new() -> Self {
        Self
    }

    pub fn check(
        &self,
        criteria: &[Criterion],
        evaluations: &[EvaluationRecord],
    ) -> Result<(), InputViolation> {
        self.check_criteria(criteria)?;
        self.check_evaluations(evaluations)
    }

    pub fn check_criteria(&self, criteria: &[Criterion]) -> Result<(), InputViolation> {
        let mut seen = BTreeSet::new();
        for criterion in criteria {
            if !seen.insert(criterion.key) {
                return Err(InputViolation::DuplicateCriterion(criterion.key));
            }
            if !criterion.weight.is_finite() || !(0.0..=MAX_WEIGHT).contains(&criterion.weight) {
                return Err(InputViolation::InvalidWeight {
                    key: criterion.key,
                    weight: criterion.weight,
                });
            }
        }
        Ok(())
    }

    pub fn check_evaluations(
        &self,
        evaluations: &[EvaluationRecord],
    ) -> Result<(), InputViolation> {
        let mut seen = BTreeSet::new();
        for (index, record) in evaluations.iter().enumerate() {
            if record.employee_id.0.trim().is_empty() {
                return Err(InputViolation::MissingEmployeeId { position: index + 1 });
            }
            if !seen.insert(&record.employee_id) {
                return Err(InputViolation::DuplicateEmployee(record.employee_id.clone()));
            }
            if let Some((key, _)) = record.values.iter().find(|(_, value)| !value.is_finite()) {
                return Err(InputViolation::NonFiniteValue {
                    employee_id: record.employee_id.clone(),
                    key: *key,
                });
            }
        }
        Ok(())
    }
}
