pub mod memory;
pub mod object_id;
pub mod postgres;
pub mod store;

pub use memory::MemoryDocumentStore;
pub use object_id::ObjectId;
pub use postgres::PostgresDocumentStore;
pub use store::{validate_collection_name, Document, DocumentStore, StoreError};
