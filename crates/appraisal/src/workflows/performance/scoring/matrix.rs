use serde::{Deserialize, Serialize};

use super::super::domain::{CriterionKey, EmployeeId, EvaluationRecord};
use super::rules::NormalizationRule;

/// Employees × active criteria. Rows keep input order, columns keep canonical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionMatrix {
    pub criteria: Vec<CriterionKey>,
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub employee_id: EmployeeId,
    pub values: Vec<f64>,
}

impl DecisionMatrix {
    pub(crate) fn from_records(criteria: &[CriterionKey], employees: &[EvaluationRecord]) -> Self {
        let rows = employees
            .iter()
            .map(|record| MatrixRow {
                employee_id: record.employee_id.clone(),
                values: criteria.iter().map(|key| record.value(*key)).collect(),
            })
            .collect();

        Self {
            criteria: criteria.to_vec(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, index: usize) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| row.values.get(index).copied().unwrap_or(0.0))
            .collect()
    }

    pub fn value(&self, employee_id: &EmployeeId, key: CriterionKey) -> Option<f64> {
        let column = self.criteria.iter().position(|candidate| *candidate == key)?;
        self.rows
            .iter()
            .find(|row| &row.employee_id == employee_id)
            .and_then(|row| row.values.get(column).copied())
    }

    /// Apply one rule per column. `rules` is parallel to `criteria`.
    pub(crate) fn normalize(&self, rules: &[NormalizationRule]) -> Self {
        let mut rows: Vec<MatrixRow> = self
            .rows
            .iter()
            .map(|row| MatrixRow {
                employee_id: row.employee_id.clone(),
                values: Vec::with_capacity(self.criteria.len()),
            })
            .collect();

        for (index, rule) in rules.iter().enumerate().take(self.criteria.len()) {
            let normalized = rule.normalize_column(&self.column(index));
            for (row, value) in rows.iter_mut().zip(normalized) {
                row.values.push(value);
            }
        }

        Self {
            criteria: self.criteria.clone(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_reads_active_columns_in_order_with_zero_defaults() {
        let employees = vec![
            EvaluationRecord::new("E-1", "Ari")
                .with_value(CriterionKey::Quality, 4.0)
                .with_value(CriterionKey::SickDays, 2.0),
            EvaluationRecord::new("E-2", "Bo").with_value(CriterionKey::Cooperation, 5.0),
        ];
        let criteria = [CriterionKey::Quality, CriterionKey::SickDays];

        let matrix = DecisionMatrix::from_records(&criteria, &employees);

        assert_eq!(matrix.criteria, criteria.to_vec());
        assert_eq!(matrix.rows[0].values, vec![4.0, 2.0]);
        assert_eq!(matrix.rows[1].values, vec![0.0, 0.0]);
        assert_eq!(
            matrix.value(&EmployeeId("E-1".to_string()), CriterionKey::SickDays),
            Some(2.0)
        );
        assert_eq!(
            matrix.value(&EmployeeId("E-1".to_string()), CriterionKey::Cooperation),
            None
        );
    }

    #[test]
    fn normalize_preserves_shape() {
        let employees = vec![
            EvaluationRecord::new("E-1", "Ari").with_value(CriterionKey::Quality, 5.0),
            EvaluationRecord::new("E-2", "Bo").with_value(CriterionKey::AbsenceDays, 1.0),
        ];
        let criteria = [CriterionKey::Quality, CriterionKey::AbsenceDays];
        let matrix = DecisionMatrix::from_records(&criteria, &employees);

        let normalized = matrix.normalize(&[
            NormalizationRule::LinearOverFive,
            NormalizationRule::ZeroOneCost,
        ]);

        assert_eq!(normalized.rows.len(), 2);
        assert_eq!(normalized.rows[0].values, vec![1.0, 1.0]);
        assert_eq!(normalized.rows[1].values, vec![0.0, 0.0]);
    }
}
