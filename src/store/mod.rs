//! Document store abstraction.
//!
//! The job board never owns its data: jobs and applications live in an
//! external document database. This module defines the narrow set of
//! operations the board needs as the [`DocumentStore`] trait, plus two
//! implementations:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │               JobBoard                  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          DocumentStore Trait            │
//! │  find / insert / set / inc / delete     │
//! └────────────────────┬────────────────────┘
//!                      │
//!          ┌───────────┴───────────┐
//!          ▼                       ▼
//! ┌─────────────────┐    ┌─────────────────────┐
//! │   MongoStore    │    │    MemoryStore      │
//! │ (MongoDB/Atlas) │    │ (in-process, tests) │
//! └─────────────────┘    └─────────────────────┘
//! ```
//!
//! Documents cross the trait boundary as JSON objects. Identifiers are the
//! 24-character hex form of a MongoDB ObjectId and are always serialized as
//! plain strings under `_id`.

mod memory;
mod mongo;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StoreError;

pub use memory::MemoryStore;
pub use mongo::{create_mongo_client, MongoStore};

/// A schemaless document as stored in a collection.
pub type Document = Map<String, Value>;

/// Name of the identifier field on every document.
pub const ID_FIELD: &str = "_id";

// =============================================================================
// Collections
// =============================================================================

/// The collections the job board reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Posted positions
    Jobs,

    /// Applications filed against jobs
    JobApplications,
}

impl Collection {
    /// Collection name in the database.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Jobs => "jobs",
            Collection::JobApplications => "job-applications",
        }
    }
}

// =============================================================================
// Filters
// =============================================================================

/// A query filter over a collection.
///
/// The board only ever filters by exact equality on a single string field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    /// Match every document
    #[default]
    All,

    /// Match documents whose `field` equals `value`
    Eq { field: String, value: String },
}

impl Filter {
    /// Equality filter on a string field.
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Check whether a document satisfies this filter.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { field, value } => {
                matches!(document.get(field), Some(Value::String(v)) if v == value)
            }
        }
    }
}

// =============================================================================
// Write Results
// =============================================================================

/// Acknowledgement for an inserted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

/// Acknowledgement for an update of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
    pub upserted_count: u64,
}

impl UpdateResult {
    /// Update result for the given match and modify counts (never an upsert).
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_id: None,
            upserted_count: 0,
        }
    }
}

/// Acknowledgement for a delete of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

// =============================================================================
// Identifiers
// =============================================================================

/// Parse an identifier into an ObjectId.
pub fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

// =============================================================================
// Store Trait
// =============================================================================

/// Operations the job board performs against its document database.
///
/// Implementations must be shareable across request handlers. Every method
/// taking an `id` rejects malformed identifiers with
/// [`StoreError::InvalidId`]; a well-formed id that matches nothing is not an
/// error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return every document in `collection` matching `filter`, in store order.
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError>;

    /// Fetch one document by identifier.
    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError>;

    /// Insert a document. Any `_id` in `document` is replaced by a fresh identifier.
    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOneResult, StoreError>;

    /// Overwrite the given top-level fields of one document, leaving the rest untouched.
    async fn set_fields(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
    ) -> Result<UpdateResult, StoreError>;

    /// Atomically add `amount` to a numeric field, treating an absent field as 0.
    async fn increment(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        amount: i64,
    ) -> Result<UpdateResult, StoreError>;

    /// Delete one document by identifier.
    async fn delete_one(&self, collection: Collection, id: &str)
        -> Result<DeleteResult, StoreError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
