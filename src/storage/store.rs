//! The document store seam shared by the Postgres and in-memory backends.

use crate::domain::DocumentFilter;
use crate::storage::ObjectId;
use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid collection name '{0}'")]
    InvalidCollection(String),
    #[error("document must be a JSON object")]
    NotAnObject,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("corrupt document {id} in '{collection}': {reason}")]
    Corrupt {
        collection: String,
        id: String,
        reason: String,
    },
}

/// A stored document: its identifier plus the body as written.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub body: Map<String, JsonValue>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend label (`postgres`, `memory`).
    fn backend(&self) -> &'static str;

    /// Up to `limit` documents from `collection` matching `filter`, in storage order.
    /// A collection that was never written to yields no documents.
    async fn find(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError>;

    /// Inserts one document and returns its new identifier.
    async fn insert(
        &self,
        collection: &str,
        body: Map<String, JsonValue>,
    ) -> Result<ObjectId, StoreError>;

    /// Names of existing collections, sorted.
    async fn collection_names(&self) -> Result<Vec<String>, StoreError>;

    /// Name of the underlying database.
    async fn database_name(&self) -> Result<String, StoreError>;
}

/// Collection names become table names, so only plain identifiers are accepted.
pub fn validate_collection_name(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid && name.len() <= 63 {
        Ok(())
    } else {
        Err(StoreError::InvalidCollection(name.to_string()))
    }
}
