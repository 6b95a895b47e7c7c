//! MongoDB-backed document store.
//!
//! Wraps a database handle from a single [`mongodb::Client`] (which pools its
//! own connections) and
//! maps the [`DocumentStore`] operations onto collection commands. Documents
//! are converted between JSON and BSON at this boundary; top-level ObjectIds
//! are rendered as plain hex strings on the way out.

use async_trait::async_trait;
use mongodb::bson::{self, doc, Bson, Document as BsonDocument};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection as MongoCollection, Database};
use serde_json::Value;
use tracing::debug;

use super::{
    parse_id, Collection, DeleteResult, Document, DocumentStore, Filter, InsertOneResult,
    UpdateResult, ID_FIELD,
};
use crate::error::StoreError;

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Create a MongoDB client for the given connection string.
///
/// The client pins the Stable API v1. No network traffic happens until the
/// first operation; call [`DocumentStore::ping`] to verify connectivity.
pub async fn create_mongo_client(uri: &str) -> Result<Client, StoreError> {
    let mut options = ClientOptions::parse(uri).await?;
    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
    Ok(Client::with_options(options)?)
}

/// MongoDB implementation of [`DocumentStore`].
///
/// # Example
///
/// ```ignore
/// use job_board::store::{create_mongo_client, MongoStore};
///
/// let client = create_mongo_client("mongodb://localhost:27017").await?;
/// let store = MongoStore::new(client, "job_Portal");
/// store.ping().await?;
/// ```
#[derive(Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Create a store over `database` using an existing client.
    pub fn new(client: Client, database: &str) -> Self {
        Self {
            database: client.database(database),
        }
    }

    /// Name of the database this store reads and writes.
    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    fn collection(&self, collection: Collection) -> MongoCollection<BsonDocument> {
        self.database.collection(collection.name())
    }
}

fn filter_document(filter: &Filter) -> BsonDocument {
    match filter {
        Filter::All => BsonDocument::new(),
        Filter::Eq { field, value } => doc! { field.as_str(): value.as_str() },
    }
}

fn to_bson(document: &Document) -> Result<BsonDocument, StoreError> {
    bson::to_document(document).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn from_bson(document: BsonDocument) -> Document {
    document
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Bson::ObjectId(oid) => Value::String(oid.to_hex()),
                other => other.into_relaxed_extjson(),
            };
            (key, value)
        })
        .collect()
}

fn id_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}

fn update_result(result: mongodb::results::UpdateResult) -> UpdateResult {
    UpdateResult {
        acknowledged: true,
        matched_count: result.matched_count,
        modified_count: result.modified_count,
        upserted_count: u64::from(result.upserted_id.is_some()),
        upserted_id: result.upserted_id.map(id_string),
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        let mut cursor = self
            .collection(collection)
            .find(filter_document(filter))
            .await?;

        let mut documents = Vec::new();
        while cursor.advance().await? {
            documents.push(from_bson(cursor.deserialize_current()?));
        }

        debug!(
            collection = collection.name(),
            count = documents.len(),
            "Fetched documents"
        );
        Ok(documents)
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let oid = parse_id(id)?;
        let found = self
            .collection(collection)
            .find_one(doc! { ID_FIELD: oid })
            .await?;
        Ok(found.map(from_bson))
    }

    async fn insert_one(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<InsertOneResult, StoreError> {
        document.remove(ID_FIELD);
        let bson_document = to_bson(&document)?;

        let result = self
            .collection(collection)
            .insert_one(bson_document)
            .await?;

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id_string(result.inserted_id),
        })
    }

    async fn set_fields(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
    ) -> Result<UpdateResult, StoreError> {
        let oid = parse_id(id)?;
        let fields = to_bson(&fields)?;

        let result = self
            .collection(collection)
            .update_one(doc! { ID_FIELD: oid }, doc! { "$set": fields })
            .await?;

        Ok(update_result(result))
    }

    async fn increment(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        amount: i64,
    ) -> Result<UpdateResult, StoreError> {
        let oid = parse_id(id)?;

        let result = self
            .collection(collection)
            .update_one(doc! { ID_FIELD: oid }, doc! { "$inc": { field: amount } })
            .await?;

        Ok(update_result(result))
    }

    async fn delete_one(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<DeleteResult, StoreError> {
        let oid = parse_id(id)?;

        let result = self
            .collection(collection)
            .delete_one(doc! { ID_FIELD: oid })
            .await?;

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
