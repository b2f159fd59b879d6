use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::repository::{SnapshotStore, StoreError};
use super::service::{AppraisalRequest, AppraisalService, AppraisalServiceError};

/// Router builder exposing the appraisal calculation endpoints.
pub fn appraisal_router<S>(service: Arc<AppraisalService<S>>) -> Router
where
    S: SnapshotStore + 'static,
{
    Router::new()
        .route("/api/v1/appraisals", post(calculate_handler::<S>))
        .route("/api/v1/appraisals/latest", get(latest_handler::<S>))
        .route("/api/v1/appraisals/preview", post(preview_handler::<S>))
        .with_state(service)
}

pub(crate) async fn calculate_handler<S>(
    State(service): State<Arc<AppraisalService<S>>>,
    axum::Json(request): axum::Json<AppraisalRequest>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    match service.calculate(request) {
        Ok(snapshot) => (StatusCode::CREATED, axum::Json(snapshot.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn latest_handler<S>(State(service): State<Arc<AppraisalService<S>>>) -> Response
where
    S: SnapshotStore + 'static,
{
    match service.latest() {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot.view())).into_response(),
        Err(AppraisalServiceError::Store(StoreError::NotFound)) => {
            let payload = json!({
                "error": "no appraisal has been calculated yet",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler<S>(
    State(service): State<Arc<AppraisalService<S>>>,
    axum::Json(request): axum::Json<AppraisalRequest>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    match service.preview(&request) {
        Ok(computation) => {
            let payload = json!({
                "summary": computation.summary(),
                "results": computation.result_views(),
                "decision_matrix": computation.decision_matrix,
                "normalized_matrix": computation.normalized_matrix,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: AppraisalServiceError) -> Response {
    let status = match &error {
        AppraisalServiceError::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppraisalServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        AppraisalServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
