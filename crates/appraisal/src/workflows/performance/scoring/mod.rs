mod config;
mod matrix;
mod policy;
mod rules;

pub use config::{
    AttendanceRule, PerformanceRule, RatingConversion, ScoringOptions,
    COLUMN_MAX_SCALE_FACTOR, DEFAULT_ABSENCE_OVERRIDE_THRESHOLD, MAX_RATING, MIN_RATING,
    PROMOTION_NOTE, PROMOTION_RATING, RATING_SCALE, RETENTION_RATING,
};
pub use matrix::{DecisionMatrix, MatrixRow};
pub use policy::{override_note, Rank, Recommendation};
pub use rules::NormalizationRule;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Criterion, CriterionKey, CriterionType, EmployeeId, EvaluationRecord};
use policy::{decide_recommendation, rank_employees, ScoredEmployee};

/// Stateless SAW evaluator over a fixed weight/type table.
///
/// Only criteria present in the weight map take part in a computation; the remaining
/// canonical keys are left out of the matrices entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct SawEngine {
    weights: BTreeMap<CriterionKey, f64>,
    types: BTreeMap<CriterionKey, CriterionType>,
    options: ScoringOptions,
}

impl SawEngine {
    /// `weights` are fractions (percentage / 100). Keys missing from `types` use their
    /// canonical type.
    pub fn new(
        weights: BTreeMap<CriterionKey, f64>,
        types: BTreeMap<CriterionKey, CriterionType>,
        options: ScoringOptions,
    ) -> Self {
        Self {
            weights,
            types,
            options,
        }
    }

    pub fn from_criteria(criteria: &[Criterion], options: ScoringOptions) -> Self {
        let weights = criteria
            .iter()
            .map(|criterion| (criterion.key, criterion.weight_fraction()))
            .collect();
        let types = criteria
            .iter()
            .map(|criterion| (criterion.key, criterion.criterion_type))
            .collect();
        Self::new(weights, types, options)
    }

    pub fn options(&self) -> &ScoringOptions {
        &self.options
    }

    pub fn active_criteria(&self) -> Vec<CriterionKey> {
        CriterionKey::ordered()
            .into_iter()
            .filter(|key| self.weights.contains_key(key))
            .collect()
    }

    pub fn criterion_type(&self, key: CriterionKey) -> CriterionType {
        self.types
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.canonical_type())
    }

    /// Normalization rule resolved for every active criterion, in canonical order.
    pub fn rule_table(&self) -> Vec<(CriterionKey, NormalizationRule)> {
        self.active_criteria()
            .into_iter()
            .map(|key| {
                (
                    key,
                    rules::rule_for(key, self.criterion_type(key), &self.options),
                )
            })
            .collect()
    }

    pub fn compute(&self, employees: &[EvaluationRecord]) -> SawComputation {
        let rule_table = self.rule_table();
        let criteria: Vec<CriterionKey> = rule_table.iter().map(|(key, _)| *key).collect();
        let rules: Vec<NormalizationRule> = rule_table.iter().map(|(_, rule)| *rule).collect();
        let weights: Vec<f64> = criteria
            .iter()
            .map(|key| self.weights.get(key).copied().unwrap_or(0.0))
            .collect();

        let decision_matrix = DecisionMatrix::from_records(&criteria, employees);
        let normalized_matrix = decision_matrix.normalize(&rules);

        let threshold = self.options.absence_override_threshold;
        let scored = employees
            .iter()
            .zip(&normalized_matrix.rows)
            .map(|(record, row)| {
                let final_score = row
                    .values
                    .iter()
                    .zip(&weights)
                    .fold(0.0, |total, (value, weight)| total + value * weight);
                let converted_rating = self.options.rating_conversion.convert(final_score);
                let absence_days = record.value(CriterionKey::AbsenceDays);
                let overridden = absence_days > f64::from(threshold);
                let verdict =
                    decide_recommendation(overridden, absence_days, threshold, converted_rating);

                ScoredEmployee {
                    employee_id: record.employee_id.clone(),
                    employee_name: record.employee_name.clone(),
                    normalized: row.values.clone(),
                    final_score,
                    converted_rating,
                    overridden,
                    verdict,
                }
            })
            .collect();

        let results = rank_employees(scored);

        debug!(
            employees = employees.len(),
            criteria = criteria.len(),
            overridden = results.iter().filter(|result| result.overridden).count(),
            "computed SAW ranking"
        );

        SawComputation {
            decision_matrix,
            normalized_matrix,
            results,
        }
    }
}

/// Full output of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SawComputation {
    pub decision_matrix: DecisionMatrix,
    pub normalized_matrix: DecisionMatrix,
    pub results: Vec<RankedResult>,
}

/// Per-employee outcome, ordered by rank in [`SawComputation::results`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub normalized: Vec<f64>,
    pub final_score: f64,
    pub converted_rating: f64,
    pub rank: Rank,
    pub recommendation: Recommendation,
    pub note: Option<String>,
    pub overridden: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(weights: &[(CriterionKey, f64)], options: ScoringOptions) -> SawEngine {
        let criteria: Vec<Criterion> = weights
            .iter()
            .map(|(key, weight)| Criterion::standard(*key, *weight))
            .collect();
        SawEngine::from_criteria(&criteria, options)
    }

    #[test]
    fn inactive_criteria_are_excluded_not_zero_filled() {
        let engine = engine(
            &[(CriterionKey::SickDays, 50.0), (CriterionKey::Quality, 50.0)],
            ScoringOptions::default(),
        );
        let employees = vec![EvaluationRecord::new("E-1", "Ari")
            .with_value(CriterionKey::Quality, 5.0)
            .with_value(CriterionKey::Initiative, 1.0)];

        let computation = engine.compute(&employees);

        assert_eq!(
            computation.decision_matrix.criteria,
            vec![CriterionKey::Quality, CriterionKey::SickDays]
        );
        assert_eq!(computation.decision_matrix.rows[0].values, vec![5.0, 0.0]);
        assert_eq!(computation.results[0].normalized, vec![1.0, 1.0]);
        assert!((computation.results[0].final_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn missing_type_uses_canonical_type() {
        let mut weights = BTreeMap::new();
        weights.insert(CriterionKey::WarningLetterFlag, 1.0);
        let engine = SawEngine::new(weights, BTreeMap::new(), ScoringOptions::default());

        assert_eq!(
            engine.rule_table(),
            vec![(
                CriterionKey::WarningLetterFlag,
                NormalizationRule::InvertedBinaryFlag
            )]
        );
    }

    #[test]
    fn empty_weights_give_zero_scores() {
        let engine = SawEngine::new(
            BTreeMap::new(),
            BTreeMap::new(),
            ScoringOptions::default(),
        );
        let computation = engine.compute(&[EvaluationRecord::new("E-1", "Ari")
            .with_value(CriterionKey::Quality, 5.0)]);

        let result = &computation.results[0];
        assert!(result.normalized.is_empty());
        assert_eq!(result.final_score, 0.0);
        assert_eq!(result.converted_rating, MIN_RATING);
        assert_eq!(result.recommendation, Recommendation::Terminated);
        assert_eq!(result.rank, Rank::Position(1));
    }

    #[test]
    fn override_reads_raw_absences_even_when_inactive() {
        let engine = engine(&[(CriterionKey::Quality, 100.0)], ScoringOptions::default());
        let computation = engine.compute(&[EvaluationRecord::new("E-1", "Ari")
            .with_value(CriterionKey::Quality, 5.0)
            .with_value(CriterionKey::AbsenceDays, 14.0)]);

        assert!(computation.results[0].overridden);
        assert_eq!(computation.results[0].rank, Rank::Overridden);
    }

    #[test]
    fn custom_threshold_moves_the_override_boundary() {
        let options = ScoringOptions {
            absence_override_threshold: 3,
            ..ScoringOptions::default()
        };
        let engine = engine(&[(CriterionKey::Quality, 100.0)], options);
        let computation = engine.compute(&[
            EvaluationRecord::new("E-1", "Ari").with_value(CriterionKey::AbsenceDays, 3.0),
            EvaluationRecord::new("E-2", "Bo").with_value(CriterionKey::AbsenceDays, 4.0),
        ]);

        assert!(!computation.results[0].overridden);
        assert_eq!(computation.results[1].employee_id.0, "E-2");
        assert!(computation.results[1].overridden);
    }
}
