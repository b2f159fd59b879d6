pub mod criteria;
pub mod domain;
pub mod report;
pub mod review;
pub mod scoring;

pub use criteria::{CategoryDrift, CriteriaCatalog, CriteriaError, CriterionUpdate};
pub use domain::{
    Criterion, CriterionCategory, CriterionKey, CriterionType, EmployeeId, EvaluationRecord,
    UnknownCriterionKey,
};
pub use report::views::{AppraisalSummary, ResultView, SnapshotView};
pub use scoring::{
    AttendanceRule, DecisionMatrix, MatrixRow, NormalizationRule, PerformanceRule, Rank,
    RankedResult, RatingConversion, Recommendation, SawComputation, SawEngine, ScoringOptions,
};
