use crate::infra::{parse_attendance_rule, parse_performance_rule, InMemorySnapshotStore};
use appraisal::config::AppConfig;
use appraisal::error::AppError;
use appraisal::workflows::import::{CriteriaImporter, EvaluationImporter};
use appraisal::workflows::performance::review::{AppraisalRequest, AppraisalService};
use appraisal::workflows::performance::{
    AppraisalSummary, AttendanceRule, CriteriaCatalog, CriterionKey, CriterionUpdate,
    EvaluationRecord, PerformanceRule, RatingConversion, ResultView, ScoringOptions,
};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Criteria CSV (key,name,type,weight,category). Defaults to the standard criteria.
    #[arg(long)]
    pub(crate) criteria: Option<PathBuf>,
    /// Evaluations CSV (employee_id,employee_name,<criterion keys>)
    #[arg(long)]
    pub(crate) evaluations: PathBuf,
    /// Normalization for performance ratings: over_five or column_max
    #[arg(long, value_parser = parse_performance_rule)]
    pub(crate) performance_rule: Option<PerformanceRule>,
    /// Normalization for attendance deficiencies: any_occurrence or min_over_value
    #[arg(long, value_parser = parse_attendance_rule)]
    pub(crate) attendance_rule: Option<AttendanceRule>,
    /// Keep fractional ratings instead of rounding to whole numbers
    #[arg(long)]
    pub(crate) continuous_rating: bool,
    /// Unexcused absences above this many days force termination
    #[arg(long)]
    pub(crate) absence_threshold: Option<u32>,
    /// Print the ranking as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the demo ranking as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        criteria,
        evaluations,
        performance_rule,
        attendance_rule,
        continuous_rating,
        absence_threshold,
        json,
    } = args;

    let mut options = AppConfig::load()?.scoring;
    if let Some(rule) = performance_rule {
        options.performance_rule = rule;
    }
    if let Some(rule) = attendance_rule {
        options.attendance_rule = rule;
    }
    if continuous_rating {
        options.rating_conversion = RatingConversion::Continuous;
    }
    if let Some(threshold) = absence_threshold {
        options.absence_override_threshold = threshold;
    }

    let catalog = match criteria {
        Some(path) => CriteriaImporter::from_path(path)?,
        None => CriteriaCatalog::standard(),
    };
    if let Err(err) = catalog.validate() {
        eprintln!("warning: {err}");
    }
    let evaluations = EvaluationImporter::from_path(evaluations)?;

    let service = AppraisalService::new(Arc::new(InMemorySnapshotStore::default()), options);
    let computation = service.preview(&AppraisalRequest {
        criteria: catalog.into_criteria(),
        evaluations,
        options: None,
    })?;

    let summary = computation.summary();
    let results = computation.result_views();
    if json {
        print_json(&summary, &results, &options);
    } else {
        render_ranking(&summary, &results, &options);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let options = ScoringOptions::default();
    let store = Arc::new(InMemorySnapshotStore::default());
    let service = AppraisalService::new(store, options);

    let snapshot = service.calculate(AppraisalRequest {
        criteria: CriteriaCatalog::standard().into_criteria(),
        evaluations: demo_cohort(),
        options: None,
    })?;
    let view = snapshot.view();

    if args.json {
        print_json(&view.summary, &view.results, &view.options);
        return Ok(());
    }

    println!("Performance appraisal demo");
    println!(
        "Snapshot {} calculated at {}",
        view.id,
        view.calculated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    render_ranking(&view.summary, &view.results, &view.options);

    println!("\nCriteria rebalancing");
    let mut catalog = CriteriaCatalog::standard();
    let update = CriterionUpdate {
        weight: Some(10.0),
        ..CriterionUpdate::default()
    };
    if let Err(err) = catalog.update(CriterionKey::AbsenceDays, update) {
        println!("  Update rejected: {err}");
        return Ok(());
    }
    println!("- Raised Unexcused Absences to 10 points; Attendance peers rescaled:");
    for criterion in catalog
        .criteria()
        .iter()
        .filter(|criterion| criterion.category == CriterionKey::AbsenceDays.category())
    {
        println!("    - {}: {:.2}", criterion.name, criterion.weight);
    }
    for (category, total) in catalog.category_totals() {
        println!(
            "  {} total {:.2} (target {:.2})",
            category.label(),
            total,
            category.target_weight()
        );
    }

    Ok(())
}

fn demo_cohort() -> Vec<EvaluationRecord> {
    let ratings = |id: &str, name: &str, scores: [f64; 6]| {
        CriterionKey::ordered()
            .into_iter()
            .filter(|key| key.is_performance_rating())
            .zip(scores)
            .fold(EvaluationRecord::new(id, name), |record, (key, score)| {
                record.with_value(key, score)
            })
    };

    vec![
        ratings("EMP-001", "Rina Hartono", [5.0, 5.0, 4.0, 5.0, 4.0, 5.0])
            .with_value(CriterionKey::AchievementFlag, 1.0),
        ratings("EMP-002", "Bayu Saputra", [3.0, 4.0, 3.0, 3.0, 3.0, 4.0])
            .with_value(CriterionKey::LatenessCount, 2.0)
            .with_value(CriterionKey::SickDays, 1.0),
        ratings("EMP-003", "Dewi Lestari", [4.0, 4.0, 5.0, 4.0, 5.0, 4.0])
            .with_value(CriterionKey::AbsenceDays, 12.0),
        ratings("EMP-004", "Agus Pratama", [2.0, 2.0, 3.0, 2.0, 1.0, 2.0])
            .with_value(CriterionKey::AbsenceDays, 3.0)
            .with_value(CriterionKey::EarlyDepartureCount, 4.0)
            .with_value(CriterionKey::WarningLetterFlag, 1.0),
        ratings("EMP-005", "Sari Wijaya", [4.0, 3.0, 4.0, 4.0, 3.0, 4.0])
            .with_value(CriterionKey::PermittedLeaveDays, 2.0),
    ]
}

fn print_json(summary: &AppraisalSummary, results: &[ResultView], options: &ScoringOptions) {
    let payload = json!({
        "options": options,
        "summary": summary,
        "results": results,
    });
    match serde_json::to_string_pretty(&payload) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Ranking payload unavailable: {err}"),
    }
}

pub(crate) fn render_ranking(
    summary: &AppraisalSummary,
    results: &[ResultView],
    options: &ScoringOptions,
) {
    println!(
        "Scoring: performance={} attendance={} rating={} absence threshold={} days",
        options.performance_rule.as_str(),
        options.attendance_rule.as_str(),
        options.rating_conversion.as_str(),
        options.absence_override_threshold
    );
    println!(
        "{:<5} {:<12} {:<20} {:>8} {:>7}  {:<11} Note",
        "Rank", "Employee", "Name", "Score", "Rating", "Outcome"
    );
    for result in results {
        println!(
            "{:<5} {:<12} {:<20} {:>8} {:>7}  {:<11} {}",
            result.rank_label,
            result.employee_id.0,
            result.employee_name,
            result.score_label,
            result.rating_label,
            result.recommendation_label,
            result.note.as_deref().unwrap_or("")
        );
    }
    println!(
        "{} employees | {} retained | {} terminated ({} by absence override) | {} promotion candidates | mean score {:.4}",
        summary.employees,
        summary.retained,
        summary.terminated,
        summary.overridden,
        summary.promotion_candidates,
        summary.mean_final_score
    );
    if let Some(top) = &summary.top_performer {
        println!("Top performer: {} ({})", top.employee_name, top.employee_id);
    }
}
