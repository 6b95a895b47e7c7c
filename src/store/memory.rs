//! In-process document store.
//!
//! Keeps every collection in a `Vec` behind a single `RwLock`, preserving
//! insertion order. Used by the test suite and by `--in-memory` development
//! runs where no MongoDB deployment is available. Each write holds the lock
//! for its whole read-modify-write, so increments never interleave.

use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde_json::{Number, Value};
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    parse_id, Collection, DeleteResult, Document, DocumentStore, Filter, InsertOneResult,
    UpdateResult, ID_FIELD,
};
use crate::error::StoreError;

/// Document store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently in `collection`.
    pub async fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }

    /// Whether `collection` holds no documents.
    pub async fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection).await == 0
    }
}

fn has_id(document: &Document, id: &ObjectId) -> bool {
    matches!(document.get(ID_FIELD), Some(Value::String(v)) if *v == id.to_hex())
}

fn add_to(current: Option<&Value>, field: &str, amount: i64) -> Result<Value, StoreError> {
    let non_numeric = || {
        StoreError::Backend(format!(
            "Cannot apply $inc to non-numeric field '{}'",
            field
        ))
    };

    match current {
        None => Ok(Value::from(amount)),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i.checked_add(amount)
                    .map(Value::from)
                    .ok_or_else(|| StoreError::Backend(format!("$inc overflow on '{}'", field)))
            } else {
                let f = n.as_f64().ok_or_else(non_numeric)?;
                Number::from_f64(f + amount as f64)
                    .map(Value::Number)
                    .ok_or_else(non_numeric)
            }
        }
        Some(_) => Err(non_numeric()),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let oid = parse_id(id)?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| has_id(d, &oid)))
            .cloned())
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOneResult, StoreError> {
        let id = ObjectId::new().to_hex();

        let mut stored = Document::with_capacity(document.len() + 1);
        stored.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        stored.extend(document.into_iter().filter(|(k, _)| k != ID_FIELD));

        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(stored);

        debug!(collection = collection.name(), id = %id, "Inserted document");

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn set_fields(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
    ) -> Result<UpdateResult, StoreError> {
        let oid = parse_id(id)?;
        let mut collections = self.collections.write().await;

        let Some(document) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| has_id(d, &oid)))
        else {
            return Ok(UpdateResult::new(0, 0));
        };

        let mut modified = false;
        for (key, value) in fields {
            if key == ID_FIELD {
                return Err(StoreError::Backend(
                    "Performing an update on the path '_id' would modify the immutable field '_id'"
                        .to_string(),
                ));
            }
            if document.get(&key) != Some(&value) {
                document.insert(key, value);
                modified = true;
            }
        }

        Ok(UpdateResult::new(1, u64::from(modified)))
    }

    async fn increment(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        amount: i64,
    ) -> Result<UpdateResult, StoreError> {
        let oid = parse_id(id)?;
        let mut collections = self.collections.write().await;

        let Some(document) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| has_id(d, &oid)))
        else {
            return Ok(UpdateResult::new(0, 0));
        };

        let updated = add_to(document.get(field), field, amount)?;
        document.insert(field.to_string(), updated);

        Ok(UpdateResult::new(1, 1))
    }

    async fn delete_one(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<DeleteResult, StoreError> {
        let oid = parse_id(id)?;
        let mut collections = self.collections.write().await;

        let deleted_count = match collections.get_mut(&collection) {
            Some(docs) => match docs.iter().position(|d| has_id(d, &oid)) {
                Some(index) => {
                    docs.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
