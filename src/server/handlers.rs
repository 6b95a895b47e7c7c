//! HTTP request handlers for the job board API.
//!
//! # Endpoints
//!
//! - `POST /jwt` - Issue a session token cookie
//! - `POST /logout` - Clear the session token cookie
//! - `GET /jobs`, `GET /jobs/{id}`, `POST /jobs` - Job postings
//! - `GET /job-applications/job/{job_id}` - Applications for a job
//! - `POST /job-applications` - File an application
//! - `PATCH /job-applications/{id}` - Update an application's status
//! - `GET /job-application?email=` - An applicant's own applications (session required)
//! - `DELETE /job-application/{id}` - Delete an application
//! - `GET /` and `GET /health` - Liveness

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::board::JobBoard;
use crate::error::{AuthError, BoardError, StoreError};
use crate::store::{DeleteResult, Document, DocumentStore, InsertOneResult, UpdateResult};

use super::auth::{Identity, TokenAuth};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state passed to all handlers via Axum's State extractor.
pub struct AppState<S: DocumentStore> {
    /// Job and application operations over the shared store
    pub board: JobBoard<S>,

    /// Session token issuer
    pub auth: TokenAuth,
}

impl<S: DocumentStore> AppState<S> {
    /// Create application state from a board and token issuer.
    pub fn new(board: JobBoard<S>, auth: TokenAuth) -> Self {
        Self { board, auth }
    }
}

impl<S: DocumentStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            board: self.board.clone(),
            auth: self.auth.clone(),
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters carrying an optional email.
#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of a status update.
#[derive(Debug, Default, Deserialize)]
pub struct StatusUpdate {
    /// New status. Any JSON value is accepted; a missing status stores `null`.
    #[serde(default)]
    pub status: Value,
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response for store and board failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "invalid_id", "storage_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Acknowledgement body for `/jwt` and `/logout`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert BoardError to HTTP response.
///
/// Every store failure is a server error, including malformed identifiers.
impl IntoResponse for BoardError {
    fn into_response(self) -> Response {
        let (error_type, message) = match &self {
            BoardError::Store(StoreError::InvalidId(_)) => ("invalid_id", self.to_string()),
            BoardError::Store(StoreError::Backend(_)) => ("storage_error", self.to_string()),
            BoardError::Store(StoreError::Serialization(_)) => {
                ("serialization_error", self.to_string())
            }
        };
        let status = StatusCode::INTERNAL_SERVER_ERROR;

        error!(
            error_type = error_type,
            status = status.as_u16(),
            "Server error: {}",
            message
        );

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

/// Error returned by handlers that can fail on either auth or data access.
#[derive(Debug)]
pub enum HandlerError {
    Auth(AuthError),
    Board(BoardError),
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::Auth(err) => err.into_response(),
            HandlerError::Board(err) => err.into_response(),
        }
    }
}

impl From<AuthError> for HandlerError {
    fn from(err: AuthError) -> Self {
        HandlerError::Auth(err)
    }
}

impl From<BoardError> for HandlerError {
    fn from(err: BoardError) -> Self {
        HandlerError::Board(err)
    }
}

// =============================================================================
// Session Handlers
// =============================================================================

/// Issue a session token for the posted identity.
///
/// # Endpoint
///
/// `POST /jwt` with any JSON object body, e.g. `{"email": "a@x.com"}`.
/// A request without a JSON content type signs an empty identity.
///
/// # Response
///
/// `200 OK` with `{"success": true}` and a `Set-Cookie: token=...` header.
pub async fn issue_token_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    jar: CookieJar,
    identity: Option<Json<Document>>,
) -> Result<(CookieJar, Json<SuccessResponse>), AuthError> {
    let identity = identity.map(|Json(identity)| identity).unwrap_or_default();
    let (token, expiry) = state.auth.issue(identity)?;
    debug!(expiry = expiry, "Issued session token");

    Ok((
        jar.add(state.auth.session_cookie(token)),
        Json(SuccessResponse { success: true }),
    ))
}

/// Clear the session cookie.
///
/// # Endpoint
///
/// `POST /logout`
///
/// # Response
///
/// `200 OK` with `{"success": true}` and an expired `token` cookie. The
/// response is identical whether or not a session existed.
pub async fn logout_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    (
        jar.add(state.auth.removal_cookie()),
        Json(SuccessResponse { success: true }),
    )
}

// =============================================================================
// Job Handlers
// =============================================================================

/// List jobs.
///
/// # Endpoint
///
/// `GET /jobs?email={hr_email}`
///
/// Without `email`, returns every job.
pub async fn list_jobs_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Document>>, BoardError> {
    let jobs = state.board.list_jobs(query.email.as_deref()).await?;
    Ok(Json(jobs))
}

/// Fetch one job.
///
/// # Endpoint
///
/// `GET /jobs/{id}`
///
/// # Response
///
/// - `200 OK` with the job, or `null` if no job has this id
/// - `500 Internal Server Error` if the id is malformed
pub async fn get_job_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, BoardError> {
    Ok(Json(state.board.get_job(&id).await?))
}

/// Create a job posting.
///
/// # Endpoint
///
/// `POST /jobs` with the job document as body
///
/// # Response
///
/// `200 OK` with `{"acknowledged": true, "insertedId": "..."}`
pub async fn create_job_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Json(job): Json<Document>,
) -> Result<Json<InsertOneResult>, BoardError> {
    Ok(Json(state.board.create_job(job).await?))
}

// =============================================================================
// Application Handlers
// =============================================================================

/// List applications filed against a job.
///
/// # Endpoint
///
/// `GET /job-applications/job/{job_id}`
pub async fn job_applications_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<Document>>, BoardError> {
    Ok(Json(state.board.list_applications_for_job(&job_id).await?))
}

/// File an application and bump the job's application count.
///
/// # Endpoint
///
/// `POST /job-applications` with the application document as body
///
/// # Response
///
/// `200 OK` with the insertion result, even if the referenced job is missing.
pub async fn create_application_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Json(application): Json<Document>,
) -> Result<Json<InsertOneResult>, BoardError> {
    Ok(Json(state.board.create_application(application).await?))
}

/// Update an application's status.
///
/// # Endpoint
///
/// `PATCH /job-applications/{id}` with `{"status": ...}`. A request without a
/// JSON content type sets the status to `null`.
///
/// # Response
///
/// `200 OK` with `{"acknowledged": true, "matchedCount": n, "modifiedCount": n, ...}`
pub async fn update_application_status_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    update: Option<Json<StatusUpdate>>,
) -> Result<Json<UpdateResult>, BoardError> {
    let update = update.map(|Json(update)| update).unwrap_or_default();
    Ok(Json(
        state
            .board
            .update_application_status(&id, update.status)
            .await?,
    ))
}

/// List the caller's own applications, enriched with job details.
///
/// # Endpoint
///
/// `GET /job-application?email={applicant_email}` (session cookie required)
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session cookie
/// - `403 Forbidden`: `email` does not match the session identity
pub async fn applicant_applications_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    identity: Identity,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Document>>, HandlerError> {
    let email = identity.authorize_email(query.email.as_deref())?;
    let applications = state.board.list_applications_for_applicant(email).await?;
    Ok(Json(applications))
}

/// Delete an application.
///
/// # Endpoint
///
/// `DELETE /job-application/{id}`
///
/// # Response
///
/// `200 OK` with `{"acknowledged": true, "deletedCount": n}`
pub async fn delete_application_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, BoardError> {
    Ok(Json(state.board.delete_application(&id).await?))
}

// =============================================================================
// Liveness Handlers
// =============================================================================

/// Plain-text liveness response at `GET /`.
pub async fn root_handler() -> &'static str {
    "hello world!!!"
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
