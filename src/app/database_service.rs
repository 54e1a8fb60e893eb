//! The data access layer.
//!
//! Thin functions over a [`DocumentStore`]: find up to `limit` documents matching a
//! filter, insert one record and hand back its identifier, and a best-effort status check used
//! by the diagnostic endpoint. No retries, no transactions.

use crate::domain::DocumentFilter;
use crate::storage::{
    Document, DocumentStore, MemoryDocumentStore, PostgresDocumentStore, StoreError,
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

/// Number of collection names the status check reports.
pub const STATUS_COLLECTION_LIMIT: usize = 10;

/// What [`DatabaseService::status`] found out about the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub backend: &'static str,
    pub database_name: String,
    pub collections: Vec<String>,
}

/// Shared handle to the document store, cloned into every request.
#[derive(Clone)]
pub struct DatabaseService {
    store: Arc<dyn DocumentStore>,
}

impl DatabaseService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// A service over a fresh in-process store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryDocumentStore::new()))
    }

    /// Builds the store named by `database_url`.
    ///
    /// `memory://` selects the in-process store; anything else is handed to Postgres,
    /// which connects on first use. Fails only for a malformed URL.
    pub fn connect(
        database_url: &str,
        database_name: Option<&str>,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        if database_url.starts_with("memory:") {
            return Ok(Self::in_memory());
        }
        let store = PostgresDocumentStore::connect(
            database_url,
            database_name,
            max_connections,
            acquire_timeout,
        )?;
        Ok(Self::new(Arc::new(store)))
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Returns up to `limit` documents of `collection_name` matching `filter`.
    pub async fn get_documents(
        &self,
        collection_name: &str,
        filter: &DocumentFilter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let docs = self.store.find(collection_name, filter, limit).await?;
        tracing::debug!(
            collection = collection_name,
            limit,
            returned = docs.len(),
            "get_documents"
        );
        Ok(docs)
    }

    /// Inserts `record` into `collection_name` and returns the new identifier as a string.
    pub async fn create_document<T: Serialize + ?Sized>(
        &self,
        collection_name: &str,
        record: &T,
    ) -> Result<String, StoreError> {
        let body = match serde_json::to_value(record)? {
            JsonValue::Object(map) => map,
            _ => return Err(StoreError::NotAnObject),
        };
        let id = self.store.insert(collection_name, body).await?;
        tracing::info!(collection = collection_name, id = %id, "document created");
        Ok(id.to_hex())
    }

    /// Lists collection names (at most [`STATUS_COLLECTION_LIMIT`]) and the database name.
    pub async fn status(&self) -> Result<StatusReport, StoreError> {
        let database_name = self.store.database_name().await?;
        let mut collections = self.store.collection_names().await?;
        collections.truncate(STATUS_COLLECTION_LIMIT);
        Ok(StatusReport {
            backend: self.store.backend(),
            database_name,
            collections,
        })
    }
}

impl std::fmt::Debug for DatabaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseService")
            .field("backend", &self.store.backend())
            .finish()
    }
}
