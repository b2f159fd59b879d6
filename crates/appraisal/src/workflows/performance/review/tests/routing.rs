use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use tower::ServiceExt;

use super::common::*;
use crate::workflows::performance::domain::{Criterion, CriterionKey};
use crate::workflows::performance::review::router::{calculate_handler, latest_handler};
use crate::workflows::performance::review::service::AppraisalService;
use crate::workflows::performance::scoring::ScoringOptions;

fn post_json(uri: &str, body: &impl serde::Serialize) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serialize request"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn calculate_route_returns_created_snapshot() {
    let (service, _) = build_service();
    let router = appraisal_router_with_service(service);

    let response = router
        .oneshot(post_json("/api/v1/appraisals", &request()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert!(payload["id"].as_str().expect("id").starts_with("calc-"));
    assert_eq!(payload["summary"]["employees"], 2);
    assert_eq!(payload["summary"]["overridden"], 1);
    assert_eq!(payload["results"][0]["rank_label"], "1");
    assert_eq!(payload["results"][1]["rank_label"], "-");
}

#[tokio::test]
async fn calculate_handler_returns_unprocessable_for_invalid_input() {
    let (service, _) = build_service();
    let mut request = request();
    request
        .criteria
        .push(Criterion::standard(CriterionKey::SickDays, 5.0));

    let response = calculate_handler::<MemoryStore>(State(Arc::new(service)), axum::Json(request))
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("sick_days"));
}

#[tokio::test]
async fn calculate_handler_returns_internal_error_on_store_failure() {
    let service = Arc::new(AppraisalService::new(
        Arc::new(UnavailableStore),
        ScoringOptions::default(),
    ));

    let response =
        calculate_handler::<UnavailableStore>(State(service), axum::Json(request())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn latest_handler_returns_not_found_when_empty() {
    let (service, _) = build_service();

    let response = latest_handler::<MemoryStore>(State(Arc::new(service))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn latest_route_returns_the_stored_snapshot() {
    let (service, _) = build_service();
    let stored = service.calculate(request()).expect("calculation succeeds");
    let router = appraisal_router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/appraisals/latest")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["id"], stored.id.0);
}

#[tokio::test]
async fn preview_route_returns_matrices_without_storing() {
    let (service, store) = build_service();
    let router = appraisal_router_with_service(service);

    let response = router
        .oneshot(post_json("/api/v1/appraisals/preview", &request()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["decision_matrix"]["rows"][1]["values"][6], 11.0);
    assert_eq!(payload["normalized_matrix"]["rows"][0]["values"][0], 1.0);
    assert_eq!(payload["summary"]["promotion_candidates"], 1);
    assert!(store.snapshots.lock().expect("store mutex").is_empty());
}
