//! In-process document store. Collections keep insertion order.

use crate::domain::DocumentFilter;
use crate::storage::store::{validate_collection_name, Document, DocumentStore, StoreError};
use crate::storage::ObjectId;
use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use tokio::sync::RwLock;

pub const MEMORY_DATABASE_NAME: &str = "memory";

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        validate_collection_name(collection)?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| filter.matches(&d.body))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(
        &self,
        collection: &str,
        body: Map<String, JsonValue>,
    ) -> Result<ObjectId, StoreError> {
        validate_collection_name(collection)?;
        let id = ObjectId::new();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.to_hex(),
                body,
            });
        Ok(id)
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self.collections.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn database_name(&self) -> Result<String, StoreError> {
        Ok(MEMORY_DATABASE_NAME.to_string())
    }
}
