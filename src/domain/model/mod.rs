//! Domain model definitions for the document collections served by this backend.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub mod collections;
pub mod registry;

pub use collections::{Gift, Product, User};
pub use registry::SchemaRegistry;

/// A constraint violation found after a payload has been deserialized.
///
/// Shape errors (missing required fields, wrong JSON types) are caught by serde before
/// this point; this covers the numeric bounds the types themselves cannot express.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("field '{field}': {reason}")]
    Field { field: &'static str, reason: String },
}

impl SchemaError {
    pub fn field(field: &'static str, reason: impl Into<String>) -> Self {
        SchemaError::Field {
            field,
            reason: reason.into(),
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            SchemaError::Field { field, .. } => *field,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            SchemaError::Field { reason, .. } => reason,
        }
    }
}

/// Trait that defines the contract for any record stored in a document collection.
///
/// Each model implementation provides:
/// - the collection it is stored in
/// - its OpenAPI schema (through `ToSchema`)
/// - optional constraint validation
pub trait CollectionModel: Serialize + DeserializeOwned + ToSchema<'static> + Send + Sync {
    /// Name of the collection records of this model live in.
    const COLLECTION: &'static str;

    /// Checks constraints that serde cannot express (numeric bounds etc).
    ///
    /// Default implementation does no validation.
    fn validate(&self) -> Result<(), SchemaError> {
        Ok(())
    }
}
