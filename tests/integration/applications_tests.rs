//! Job application integration tests.
//!
//! Tests verify:
//! - Filing applications increments the job's application count
//! - Filing against a missing job still succeeds; a malformed job id is a 500
//! - Status updates leave other fields untouched
//! - Deletion removes the application from listings
//! - The applicant listing is enriched with job details

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use super::test_utils::{
    create_application, create_job, empty_request, get, get_with_cookie, json_request, login,
    post_json, send, test_router,
};

const MISSING_ID: &str = "000000000000000000000000";

// =============================================================================
// Filing
// =============================================================================

#[tokio::test]
async fn test_applications_increment_count() {
    let router = test_router();
    let job_id = create_job(&router, &json!({"hr_email": "a@x.com", "title": "Engineer"})).await;

    let before = get(&router, &format!("/jobs/{}", job_id)).await.json();
    assert!(before.get("applicationCount").is_none());

    create_application(
        &router,
        &json!({"job_id": job_id, "applicant_email": "b@y.com"}),
    )
    .await;
    create_application(
        &router,
        &json!({"job_id": job_id, "applicant_email": "c@y.com"}),
    )
    .await;

    let after = get(&router, &format!("/jobs/{}", job_id)).await.json();
    assert_eq!(after["applicationCount"], json!(2));
    assert_eq!(after["title"], "Engineer");
}

#[tokio::test]
async fn test_application_for_missing_job_succeeds() {
    let router = test_router();

    let response = post_json(
        &router,
        "/job-applications",
        &json!({"job_id": MISSING_ID, "applicant_email": "b@y.com"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["acknowledged"], json!(true));

    let listed = get(&router, &format!("/job-applications/job/{}", MISSING_ID))
        .await
        .json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(get(&router, "/jobs").await.json(), json!([]));
}

#[tokio::test]
async fn test_application_with_malformed_job_id_is_server_error() {
    let router = test_router();

    let response = post_json(
        &router,
        "/job-applications",
        &json!({"job_id": "J1", "applicant_email": "b@y.com"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()["error"], "invalid_id");

    // Nothing was written
    let listed = get(&router, "/job-applications/job/J1").await.json();
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_list_applications_for_job() {
    let router = test_router();
    let job_id = create_job(&router, &json!({"title": "Engineer"})).await;
    let other_id = create_job(&router, &json!({"title": "Designer"})).await;

    let app_id = create_application(
        &router,
        &json!({"job_id": job_id, "applicant_email": "b@y.com", "status": "pending"}),
    )
    .await;
    create_application(
        &router,
        &json!({"job_id": other_id, "applicant_email": "b@y.com"}),
    )
    .await;

    let response = get(&router, &format!("/job-applications/job/{}", job_id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!([{
            "_id": app_id,
            "job_id": job_id,
            "applicant_email": "b@y.com",
            "status": "pending"
        }])
    );

    // Listing is a plain field match; no id parsing
    let none = get(&router, "/job-applications/job/not-an-id").await;
    assert_eq!(none.status, StatusCode::OK);
    assert_eq!(none.json(), json!([]));
}

// =============================================================================
// Status Updates
// =============================================================================

#[tokio::test]
async fn test_patch_status_leaves_other_fields() {
    let router = test_router();
    let job_id = create_job(&router, &json!({"title": "Engineer"})).await;
    let app_id = create_application(
        &router,
        &json!({
            "job_id": job_id,
            "applicant_email": "b@y.com",
            "resume": "https://cv.test/b.pdf",
            "status": "pending"
        }),
    )
    .await;

    let response = send(
        &router,
        json_request(
            Method::PATCH,
            &format!("/job-applications/{}", app_id),
            &json!({"status": "interviewed"}),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let result = response.json();
    assert_eq!(result["matchedCount"], json!(1));
    assert_eq!(result["modifiedCount"], json!(1));

    let listed = get(&router, &format!("/job-applications/job/{}", job_id))
        .await
        .json();
    assert_eq!(
        listed,
        json!([{
            "_id": app_id,
            "job_id": job_id,
            "applicant_email": "b@y.com",
            "resume": "https://cv.test/b.pdf",
            "status": "interviewed"
        }])
    );
}

#[tokio::test]
async fn test_patch_without_body_clears_status() {
    let router = test_router();
    let job_id = create_job(&router, &json!({"title": "Engineer"})).await;
    let app_id = create_application(
        &router,
        &json!({"job_id": job_id, "applicant_email": "b@y.com", "status": "pending"}),
    )
    .await;

    let uri = format!("/job-applications/{}", app_id);
    let response = send(&router, empty_request(Method::PATCH, &uri)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["matchedCount"], json!(1));

    let listed = get(&router, &format!("/job-applications/job/{}", job_id))
        .await
        .json();
    assert_eq!(listed[0]["status"], Value::Null);
    assert!(listed[0].as_object().unwrap().contains_key("status"));
    assert_eq!(listed[0]["applicant_email"], "b@y.com");
}

#[tokio::test]
async fn test_patch_missing_application_matches_nothing() {
    let router = test_router();

    let response = send(
        &router,
        json_request(
            Method::PATCH,
            &format!("/job-applications/{}", MISSING_ID),
            &json!({"status": "hired"}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["matchedCount"], json!(0));
}

#[tokio::test]
async fn test_patch_malformed_id_is_server_error() {
    let router = test_router();

    let response = send(
        &router,
        json_request(
            Method::PATCH,
            "/job-applications/A1",
            &json!({"status": "hired"}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()["error"], "invalid_id");
}

// =============================================================================
// Deletion
// =============================================================================

#[tokio::test]
async fn test_delete_application() {
    let router = test_router();
    let job_id = create_job(&router, &json!({"title": "Engineer"})).await;
    let app_id = create_application(
        &router,
        &json!({"job_id": job_id, "applicant_email": "b@y.com"}),
    )
    .await;

    let uri = format!("/job-application/{}", app_id);
    let response = send(&router, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({"acknowledged": true, "deletedCount": 1})
    );

    let listed = get(&router, &format!("/job-applications/job/{}", job_id))
        .await
        .json();
    assert_eq!(listed, json!([]));

    let again = send(&router, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.json()["deletedCount"], json!(0));
}

// =============================================================================
// Applicant Listing
// =============================================================================

#[tokio::test]
async fn test_applicant_listing_is_enriched() {
    let router = test_router();
    let job_id = create_job(
        &router,
        &json!({
            "hr_email": "a@x.com",
            "title": "Engineer",
            "company": "Acme",
            "company_logo": "https://acme.test/logo.png",
            "description": "Build things"
        }),
    )
    .await;

    let app_id = create_application(
        &router,
        &json!({"job_id": job_id, "applicant_email": "b@y.com"}),
    )
    .await;
    let orphan_id = create_application(
        &router,
        &json!({"job_id": MISSING_ID, "applicant_email": "b@y.com"}),
    )
    .await;
    create_application(
        &router,
        &json!({"job_id": job_id, "applicant_email": "c@y.com"}),
    )
    .await;

    let cookie = login(&router, "b@y.com").await;
    let response = send(
        &router,
        get_with_cookie("/job-application?email=b@y.com", &cookie),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let listed = response.json();
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 2);

    let enriched = find_by_id(listed, &app_id);
    assert_eq!(enriched["title"], "Engineer");
    assert_eq!(enriched["company"], "Acme");
    assert_eq!(enriched["company_logo"], "https://acme.test/logo.png");
    assert!(enriched.get("description").is_none());

    let orphan = find_by_id(listed, &orphan_id);
    assert!(orphan.get("title").is_none());
    assert!(orphan.get("company").is_none());
    assert!(orphan.get("company_logo").is_none());
}

fn find_by_id<'a>(documents: &'a [Value], id: &str) -> &'a Value {
    documents
        .iter()
        .find(|d| d["_id"] == id)
        .expect("document is listed")
}
