//! # Job Board
//!
//! An HTTP backend for a job portal: employers post jobs, applicants file
//! applications, and employers move applications through a status workflow.
//!
//! ## Features
//!
//! - **Jobs**: list (optionally by owner), fetch, and create postings
//! - **Applications**: file, list per job, update status, delete
//! - **Applicant view**: an applicant's own applications, enriched with job details
//! - **Sessions**: JWT session tokens carried in an http-only cookie
//! - **Storage**: MongoDB, or an in-process store for development and tests
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`store`] - Document store abstraction with MongoDB and in-memory backends
//! - [`board`] - Job and application operations over a store
//! - [`server`] - Axum-based HTTP server, session auth and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use job_board::{create_router, JobBoard, MemoryStore, RouterConfig, TokenAuth};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let board = JobBoard::new(MemoryStore::new());
//!     let auth = TokenAuth::new("my-secret-key");
//!     let router = create_router(board, auth, RouterConfig::default());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//!     axum::serve(listener, router).await
//! }
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use board::JobBoard;
pub use config::{Config, Environment};
pub use error::{AuthError, BoardError, StoreError};
pub use server::{
    create_router, AppState, CookiePolicy, ErrorResponse, HealthResponse, Identity, RouterConfig,
    TokenAuth,
};
pub use store::{
    create_mongo_client, Collection, DeleteResult, Document, DocumentStore, Filter,
    InsertOneResult, MemoryStore, MongoStore, UpdateResult,
};
