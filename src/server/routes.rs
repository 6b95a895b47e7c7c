//! Router configuration for the job board.
//!
//! This module defines the HTTP routes and applies middleware for session
//! authentication, CORS and request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /                                  - Liveness text (public)
//! /health                            - Health check (public)
//! /jwt, /logout                      - Session cookie issue/clear (public)
//! /jobs, /jobs/{id}                  - Job postings (public)
//! /job-applications/...              - Application writes and per-job listing (public)
//! /job-application                   - Applicant's own applications (session required)
//! /job-application/{id}              - Application delete (public)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use job_board::board::JobBoard;
//! use job_board::server::{auth::TokenAuth, create_router, RouterConfig};
//! use job_board::store::MemoryStore;
//!
//! let board = JobBoard::new(MemoryStore::new());
//! let auth = TokenAuth::new("my-secret-key");
//! let router = create_router(board, auth, RouterConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::auth::{verify_token, TokenAuth};
use super::handlers::{
    applicant_applications_handler, create_application_handler, create_job_handler,
    delete_application_handler, get_job_handler, health_handler, issue_token_handler,
    job_applications_handler, list_jobs_handler, logout_handler, root_handler,
    update_application_status_handler, AppState,
};
use crate::board::JobBoard;
use crate::store::DocumentStore;

// =============================================================================
// Router Configuration
// =============================================================================

/// Origins allowed to make credentialed cross-origin requests by default.
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "https://job-portal-21bfd.web.app",
    "https://job-portal-21bfd.firebaseapp.com",
];

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Origins allowed to make credentialed cross-origin requests
    pub cors_origins: Vec<String>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    /// Default origin allow-list with tracing enabled.
    fn default() -> Self {
        Self {
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            enable_tracing: true,
        }
    }
}

impl RouterConfig {
    /// Set the allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests. Wildcards are
    /// not supported because credentials are always allowed.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Public routes (liveness, session, jobs, application writes)
/// - The session-protected applicant listing
/// - CORS configuration
/// - Request tracing (optional)
///
/// # Arguments
///
/// * `board` - Job board service over the shared store
/// * `auth` - Session token issuer/verifier
/// * `config` - Router configuration
pub fn create_router<S>(board: JobBoard<S>, auth: TokenAuth, config: RouterConfig) -> Router
where
    S: DocumentStore + 'static,
{
    let app_state = AppState::new(board, auth.clone());

    // Only the applicant listing requires a session
    let protected_routes = Router::new()
        .route(
            "/job-application",
            get(applicant_applications_handler::<S>),
        )
        .route_layer(middleware::from_fn_with_state(auth, verify_token));

    let public_routes = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/jwt", post(issue_token_handler::<S>))
        .route("/logout", post(logout_handler::<S>))
        .route(
            "/jobs",
            get(list_jobs_handler::<S>).post(create_job_handler::<S>),
        )
        .route("/jobs/{id}", get(get_job_handler::<S>))
        .route(
            "/job-applications",
            post(create_application_handler::<S>),
        )
        .route(
            "/job-applications/job/{job_id}",
            get(job_applications_handler::<S>),
        )
        .route(
            "/job-applications/{id}",
            patch(update_application_status_handler::<S>),
        )
        .route(
            "/job-application/{id}",
            delete(delete_application_handler::<S>),
        );

    let router = Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .with_state(app_state)
        .layer(build_cors_layer(&config));

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400))
}

// =============================================================================
// Tests
// =============================================================================
