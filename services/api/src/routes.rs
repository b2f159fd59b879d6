use crate::infra::AppState;
use appraisal::workflows::performance::review::{appraisal_router, AppraisalService, SnapshotStore};
use appraisal::workflows::performance::{CriteriaCatalog, ScoringOptions};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_appraisal_routes<S>(service: Arc<AppraisalService<S>>) -> axum::Router
where
    S: SnapshotStore + 'static,
{
    appraisal_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/criteria/standard",
            axum::routing::get(standard_criteria_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Canonical criteria table with default scoring options, as a starting point for clients.
pub(crate) async fn standard_criteria_endpoint() -> Json<serde_json::Value> {
    let catalog = CriteriaCatalog::standard();
    let totals: Vec<_> = catalog
        .category_totals()
        .into_iter()
        .map(|(category, total)| {
            json!({
                "category": category,
                "label": category.label(),
                "target": category.target_weight(),
                "total": total,
            })
        })
        .collect();

    Json(json!({
        "criteria": catalog.criteria(),
        "categories": totals,
        "options": ScoringOptions::default(),
    }))
}
