//! HTTP server layer for the job board.
//!
//! This module provides the HTTP API over jobs and job applications.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │        /jobs  /job-applications  /job-application  /jwt         │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    auth     │  │        routes           │  │
//! │  │ (requests)  │  │(JWT cookie) │  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{verify_token, AuthError, CookiePolicy, Identity, TokenAuth, TOKEN_COOKIE};
pub use handlers::{
    applicant_applications_handler, create_application_handler, create_job_handler,
    delete_application_handler, get_job_handler, health_handler, issue_token_handler,
    job_applications_handler, list_jobs_handler, logout_handler, root_handler,
    update_application_status_handler, AppState, EmailQuery, ErrorResponse, HealthResponse,
    StatusUpdate, SuccessResponse,
};
pub use routes::{create_router, RouterConfig, DEFAULT_CORS_ORIGINS};
