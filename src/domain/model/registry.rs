//! SchemaRegistry for mapping collection names to their published record shapes.

use crate::domain::model::{CollectionModel, Gift, Product, User};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use utoipa::openapi::{RefOr, Schema};

/// A registry that maps collection names to the OpenAPI schema of their records.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<&'static str, RefOr<Schema>>,
}

impl SchemaRegistry {
    /// Creates a new empty SchemaRegistry.
    pub fn new() -> Self {
        Self {
            schemas: BTreeMap::new(),
        }
    }

    /// Registry with every collection this backend knows about.
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        reg.register::<User>();
        reg.register::<Product>();
        reg.register::<Gift>();
        reg
    }

    /// Registers a model under its collection name.
    pub fn register<M: CollectionModel>(&mut self) {
        let (_, schema) = M::schema();
        self.schemas.insert(M::COLLECTION, schema);
    }

    /// Renders `{ collection: schema }` as JSON.
    pub fn to_json(&self) -> JsonValue {
        let map = self
            .schemas
            .iter()
            .map(|(name, schema)| {
                let value = serde_json::to_value(schema).unwrap_or(JsonValue::Null);
                (name.to_string(), value)
            })
            .collect::<serde_json::Map<_, _>>();
        JsonValue::Object(map)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
