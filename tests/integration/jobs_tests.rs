//! Job posting integration tests.
//!
//! Tests verify:
//! - Create/fetch round trip
//! - Listing filtered by owner email
//! - Missing and malformed ids
//! - Liveness endpoints and CORS

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};

use super::test_utils::{create_job, get, post_json, send, test_router, ALLOWED_ORIGIN};

// =============================================================================
// Jobs
// =============================================================================

#[tokio::test]
async fn test_create_then_fetch_job() {
    let router = test_router();
    let job = json!({
        "hr_email": "a@x.com",
        "title": "Engineer",
        "company": "Acme",
        "requirements": ["rust", "mongodb"],
        "salary": {"min": 100, "max": 200}
    });

    let response = post_json(&router, "/jobs", &job).await;
    assert_eq!(response.status, StatusCode::OK);
    let created = response.json();
    assert_eq!(created["acknowledged"], json!(true));
    let id = created["insertedId"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);

    let fetched = get(&router, &format!("/jobs/{}", id)).await;
    assert_eq!(fetched.status, StatusCode::OK);

    let mut expected = job.as_object().unwrap().clone();
    expected.insert("_id".to_string(), json!(id));
    assert_eq!(fetched.json(), Value::Object(expected));
}

#[tokio::test]
async fn test_client_id_is_replaced() {
    let router = test_router();

    let id = create_job(&router, &json!({"_id": "mine", "title": "Engineer"})).await;
    assert_ne!(id, "mine");

    let fetched = get(&router, &format!("/jobs/{}", id)).await.json();
    assert_eq!(fetched["_id"], json!(id));
}

#[tokio::test]
async fn test_list_jobs_filtered_by_email() {
    let router = test_router();
    let mine = create_job(&router, &json!({"hr_email": "a@x.com", "title": "Engineer"})).await;
    create_job(&router, &json!({"hr_email": "c@x.com", "title": "Designer"})).await;

    let response = get(&router, "/jobs?email=a@x.com").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!([{"_id": mine, "hr_email": "a@x.com", "title": "Engineer"}])
    );

    let all = get(&router, "/jobs").await.json();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let none = get(&router, "/jobs?email=nobody@x.com").await.json();
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn test_list_jobs_empty_store() {
    let router = test_router();

    let response = get(&router, "/jobs").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!([]));
}

#[tokio::test]
async fn test_missing_job_is_null() {
    let router = test_router();

    let response = get(&router, "/jobs/000000000000000000000000").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), Value::Null);
}

#[tokio::test]
async fn test_malformed_job_id_is_server_error() {
    let router = test_router();

    let response = get(&router, "/jobs/J1").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);

    let body = response.json();
    assert_eq!(body["error"], "invalid_id");
    assert_eq!(body["status"], 500);
}

#[tokio::test]
async fn test_create_job_rejects_non_object() {
    let router = test_router();

    let response = post_json(&router, "/jobs", &json!("just a string")).await;
    assert!(response.status.is_client_error());

    assert_eq!(get(&router, "/jobs").await.json(), json!([]));
}

// =============================================================================
// Liveness
// =============================================================================

#[tokio::test]
async fn test_root_liveness_text() {
    let router = test_router();

    let response = get(&router, "/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "hello world!!!");
}

#[tokio::test]
async fn test_health_endpoint() {
    let router = test_router();

    let response = get(&router, "/health").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_unknown_route() {
    let router = test_router();

    let response = get(&router, "/nonexistent").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// CORS
// =============================================================================

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/jobs")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_cors_preflight_allowed_origin() {
    let router = test_router();

    let response = send(&router, preflight(ALLOWED_ORIGIN)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        ALLOWED_ORIGIN
    );
    assert_eq!(
        response
            .headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_disallowed_origin() {
    let router = test_router();

    let response = send(&router, preflight("https://evil.example")).await;
    assert!(response
        .headers
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_cors_simple_request_carries_credentials_header() {
    let router = test_router();

    let request = Request::builder()
        .uri("/jobs")
        .header(header::ORIGIN, "https://job-portal-21bfd.web.app")
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://job-portal-21bfd.web.app"
    );
    assert_eq!(
        response
            .headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}
