use chrono::{DateTime, Utc};
use serde::Serialize;

use super::super::domain::{Criterion, EmployeeId};
use super::super::scoring::{Rank, RankedResult, Recommendation, ScoringOptions};

/// One ranked row, labelled for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    pub rank_label: String,
    pub final_score: f64,
    pub score_label: String,
    pub converted_rating: f64,
    pub rating_label: String,
    pub recommendation: Recommendation,
    pub recommendation_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub overridden: bool,
}

impl From<&RankedResult> for ResultView {
    fn from(result: &RankedResult) -> Self {
        Self {
            employee_id: result.employee_id.clone(),
            employee_name: result.employee_name.clone(),
            rank: result.rank.position(),
            rank_label: result.rank.label(),
            final_score: result.final_score,
            score_label: format!("{:.4}", result.final_score),
            converted_rating: result.converted_rating,
            rating_label: rating_label(result.converted_rating),
            recommendation: result.recommendation,
            recommendation_label: result.recommendation.label(),
            note: result.note.clone(),
            overridden: result.rank == Rank::Overridden,
        }
    }
}

fn rating_label(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{rating:.0}")
    } else {
        format!("{rating:.2}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppraisalSummary {
    pub employees: usize,
    pub retained: usize,
    pub terminated: usize,
    pub overridden: usize,
    pub promotion_candidates: usize,
    pub mean_final_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_performer: Option<ResultView>,
}

/// Stored calculation as returned by the HTTP API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotView {
    pub id: String,
    pub calculated_at: DateTime<Utc>,
    pub options: ScoringOptions,
    pub criteria: Vec<Criterion>,
    pub summary: AppraisalSummary,
    pub results: Vec<ResultView>,
}
