//! Job board operations.
//!
//! [`JobBoard`] is the data-access layer behind every route. It is a thin
//! adapter over a [`DocumentStore`]: each operation maps to one or two store
//! calls, with two pieces of cross-collection behaviour:
//!
//! - creating an application increments the parent job's `applicationCount`
//! - listing an applicant's applications copies display fields from each
//!   referenced job onto the application (enrichment, never persisted)
//!
//! Write payloads are stored as given; no schema is enforced.

mod applications;
mod jobs;

use std::sync::Arc;

use crate::store::DocumentStore;

/// Field names the board interprets. Every other field is opaque.
pub mod fields {
    /// Owner of a job posting
    pub const HR_EMAIL: &str = "hr_email";

    /// Job display fields copied onto applications during enrichment
    pub const TITLE: &str = "title";
    pub const COMPANY: &str = "company";
    pub const COMPANY_LOGO: &str = "company_logo";

    /// Number of applications filed against a job
    pub const APPLICATION_COUNT: &str = "applicationCount";

    /// Reference from an application to its job
    pub const JOB_ID: &str = "job_id";

    /// Applicant identity on an application
    pub const APPLICANT_EMAIL: &str = "applicant_email";

    /// Free-form application status
    pub const STATUS: &str = "status";

    /// Fields copied from a job onto an enriched application
    pub const ENRICHED: [&str; 3] = [TITLE, COMPANY, COMPANY_LOGO];
}

/// Service implementing job and application operations over a document store.
///
/// # Type Parameters
///
/// * `S` - The document store (e.g., [`MongoStore`](crate::store::MongoStore))
///
/// # Example
///
/// ```ignore
/// use job_board::board::JobBoard;
/// use job_board::store::MemoryStore;
///
/// let board = JobBoard::new(MemoryStore::new());
/// let created = board.create_job(job).await?;
/// let job = board.get_job(&created.inserted_id).await?;
/// ```
pub struct JobBoard<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> JobBoard<S> {
    /// Create a board over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// The underlying document store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: DocumentStore> Clone for JobBoard<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}
