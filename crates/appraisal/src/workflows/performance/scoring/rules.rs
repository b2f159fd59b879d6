use serde::{Deserialize, Serialize};
use tracing::warn;

use super::super::domain::{CriterionKey, CriterionType};
use super::config::{
    AttendanceRule, PerformanceRule, ScoringOptions, COLUMN_MAX_SCALE_FACTOR, RATING_SCALE,
};

/// Column normalization applied to one criterion of the decision matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationRule {
    LinearOverFive,
    ColumnMax,
    BinaryFlag,
    ZeroOneCost,
    InvertedBinaryFlag,
    MinOverValue,
}

impl NormalizationRule {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LinearOverFive => "raw / 5",
            Self::ColumnMax => "raw / column max",
            Self::BinaryFlag => "1 if flagged",
            Self::ZeroOneCost => "1 if none recorded",
            Self::InvertedBinaryFlag => "1 if not flagged",
            Self::MinOverValue => "min nonzero / raw",
        }
    }

    /// Rescale a raw column onto [0, 1]. The output has the same length and order.
    pub fn normalize_column(self, column: &[f64]) -> Vec<f64> {
        match self {
            Self::LinearOverFive => column.iter().map(|raw| raw / RATING_SCALE).collect(),
            Self::ColumnMax => {
                let max = column
                    .iter()
                    .map(|raw| raw * COLUMN_MAX_SCALE_FACTOR)
                    .fold(f64::NEG_INFINITY, f64::max);
                if max <= 0.0 || !max.is_finite() {
                    return vec![0.0; column.len()];
                }
                column
                    .iter()
                    .map(|raw| raw * COLUMN_MAX_SCALE_FACTOR / max)
                    .collect()
            }
            Self::BinaryFlag => column
                .iter()
                .map(|raw| if *raw == 1.0 { 1.0 } else { 0.0 })
                .collect(),
            Self::ZeroOneCost => column
                .iter()
                .map(|raw| if *raw > 0.0 { 0.0 } else { 1.0 })
                .collect(),
            Self::InvertedBinaryFlag => column
                .iter()
                .map(|raw| if *raw == 0.0 { 1.0 } else { 0.0 })
                .collect(),
            Self::MinOverValue => {
                let min_positive = column
                    .iter()
                    .copied()
                    .filter(|raw| *raw > 0.0)
                    .fold(None, |min: Option<f64>, raw| {
                        Some(min.map_or(raw, |current| current.min(raw)))
                    });

                match min_positive {
                    None => vec![1.0; column.len()],
                    Some(min) => column
                        .iter()
                        .map(|raw| if *raw > 0.0 { min / raw } else { 1.0 })
                        .collect(),
                }
            }
        }
    }
}

/// Resolve the normalization rule for a criterion given its declared type.
///
/// A declared type that contradicts the key's canonical type falls back to the generic rule
/// for that type.
pub(crate) fn rule_for(
    key: CriterionKey,
    declared: CriterionType,
    options: &ScoringOptions,
) -> NormalizationRule {
    if declared != key.canonical_type() {
        warn!(
            criterion = key.as_str(),
            declared = declared.label(),
            canonical = key.canonical_type().label(),
            "criterion type contradicts its canonical type; applying generic rule"
        );
        return match declared {
            CriterionType::Benefit => NormalizationRule::ColumnMax,
            CriterionType::Cost => NormalizationRule::MinOverValue,
        };
    }

    match key {
        CriterionKey::AchievementFlag => NormalizationRule::BinaryFlag,
        CriterionKey::WarningLetterFlag => NormalizationRule::InvertedBinaryFlag,
        CriterionKey::AbsenceDays => NormalizationRule::ZeroOneCost,
        key if key.is_attendance_deficiency() => match options.attendance_rule {
            AttendanceRule::AnyOccurrence => NormalizationRule::ZeroOneCost,
            AttendanceRule::MinOverValue => NormalizationRule::MinOverValue,
        },
        _ => match options.performance_rule {
            PerformanceRule::OverFive => NormalizationRule::LinearOverFive,
            PerformanceRule::ColumnMax => NormalizationRule::ColumnMax,
        },
    }
}
