use super::super::scoring::{
    Rank, RankedResult, Recommendation, SawComputation, PROMOTION_NOTE,
};
use super::views::{AppraisalSummary, ResultView};

/// Roll a ranked result list up into headline counts.
pub fn summarize(results: &[RankedResult]) -> AppraisalSummary {
    let mut summary = AppraisalSummary {
        employees: results.len(),
        retained: 0,
        terminated: 0,
        overridden: 0,
        promotion_candidates: 0,
        mean_final_score: 0.0,
        top_performer: None,
    };

    let mut total_score = 0.0;
    for result in results {
        match result.recommendation {
            Recommendation::Retainable => summary.retained += 1,
            Recommendation::Terminated => summary.terminated += 1,
        }
        if result.overridden {
            summary.overridden += 1;
        }
        if result.note.as_deref() == Some(PROMOTION_NOTE) {
            summary.promotion_candidates += 1;
        }
        total_score += result.final_score;
    }

    if !results.is_empty() {
        summary.mean_final_score = total_score / results.len() as f64;
    }

    summary.top_performer = results
        .iter()
        .find(|result| result.rank == Rank::Position(1))
        .map(ResultView::from);

    summary
}

impl SawComputation {
    pub fn summary(&self) -> AppraisalSummary {
        summarize(&self.results)
    }

    pub fn result_views(&self) -> Vec<ResultView> {
        self.results.iter().map(ResultView::from).collect()
    }
}
