use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::super::domain::EmployeeId;
use super::config::{PROMOTION_NOTE, PROMOTION_RATING, RETENTION_RATING};
use super::RankedResult;

/// Employment outcome derived from the converted rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Retainable,
    Terminated,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Retainable => "Retainable",
            Self::Terminated => "Terminated",
        }
    }
}

/// Position in the ranking. Overridden employees sit outside the 1..K sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Position(usize),
    Overridden,
}

impl Rank {
    pub fn position(self) -> Option<usize> {
        match self {
            Self::Position(position) => Some(position),
            Self::Overridden => None,
        }
    }

    pub fn is_overridden(self) -> bool {
        matches!(self, Self::Overridden)
    }

    pub fn label(self) -> String {
        match self {
            Self::Position(position) => position.to_string(),
            Self::Overridden => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Verdict {
    pub recommendation: Recommendation,
    pub note: Option<String>,
}

pub(crate) fn decide_recommendation(
    overridden: bool,
    absence_days: f64,
    absence_threshold: u32,
    converted_rating: f64,
) -> Verdict {
    if overridden {
        return Verdict {
            recommendation: Recommendation::Terminated,
            note: Some(override_note(absence_threshold, absence_days)),
        };
    }

    if converted_rating >= PROMOTION_RATING {
        return Verdict {
            recommendation: Recommendation::Retainable,
            note: Some(PROMOTION_NOTE.to_string()),
        };
    }

    if converted_rating >= RETENTION_RATING {
        return Verdict {
            recommendation: Recommendation::Retainable,
            note: None,
        };
    }

    Verdict {
        recommendation: Recommendation::Terminated,
        note: None,
    }
}

pub fn override_note(absence_threshold: u32, absence_days: f64) -> String {
    let recorded = if absence_days.fract() == 0.0 {
        format!("{absence_days:.0}")
    } else {
        format!("{absence_days}")
    };
    format!(
        "Automatic termination: unexcused absences exceed {absence_threshold} days ({recorded} days recorded)"
    )
}

/// Score and verdict for one employee before ranking.
#[derive(Debug, Clone)]
pub(crate) struct ScoredEmployee {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub normalized: Vec<f64>,
    pub final_score: f64,
    pub converted_rating: f64,
    pub overridden: bool,
    pub verdict: Verdict,
}

impl ScoredEmployee {
    fn into_result(self, rank: Rank) -> RankedResult {
        RankedResult {
            employee_id: self.employee_id,
            employee_name: self.employee_name,
            normalized: self.normalized,
            final_score: self.final_score,
            converted_rating: self.converted_rating,
            rank,
            recommendation: self.verdict.recommendation,
            note: self.verdict.note,
            overridden: self.overridden,
        }
    }
}

/// Stable descending sort on final score; overridden employees trail in input order.
pub(crate) fn rank_employees(scored: Vec<ScoredEmployee>) -> Vec<RankedResult> {
    let (mut ranked, overridden): (Vec<_>, Vec<_>) =
        scored.into_iter().partition(|employee| !employee.overridden);

    ranked.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
    });

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, employee)| employee.into_result(Rank::Position(index + 1)))
        .chain(
            overridden
                .into_iter()
                .map(|employee| employee.into_result(Rank::Overridden)),
        )
        .collect()
}
