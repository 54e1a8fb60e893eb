pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::database_service::DatabaseService;
pub use domain::model::{CollectionModel, Gift, Product, SchemaRegistry, User};
pub use domain::DocumentFilter;
pub use storage::{DocumentStore, MemoryDocumentStore, PostgresDocumentStore, StoreError};
