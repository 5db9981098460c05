//! Storage capability set consumed by the generated routes.
//!
//! Any collaborator implementing [`Storage`] can back a resource; the route
//! generator never sees a concrete store.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::pagination::PaginationRequest;
use async_trait::async_trait;
use thiserror::Error;

/// A record as it crosses the storage boundary.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Storage-assigned record identifier.
pub type Id = i64;

#[derive(Error, Debug)]
pub enum StorageError {
    /// Unique, foreign-key or check constraint rejected the write.
    #[error("integrity conflict: {0}")]
    Conflict(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Operations a resource needs from its storage model. Each call is assumed
/// atomic for a single record; nothing spans records.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Name of the identifier field in stored records.
    fn id_field(&self) -> &str {
        "id"
    }

    /// Insert a record and return it with its assigned id.
    async fn create(&self, fields: Fields) -> Result<Fields, StorageError>;

    /// Records in insertion order, restricted to `window`.
    async fn list(&self, window: PaginationRequest) -> Result<Vec<Fields>, StorageError>;

    async fn get(&self, id: Id) -> Result<Option<Fields>, StorageError>;

    /// Overwrite the given fields, leaving the others untouched. Returns the
    /// updated record, or None if it does not exist.
    async fn update(&self, id: Id, fields: Fields) -> Result<Option<Fields>, StorageError>;

    /// Remove one record, returning its last state.
    async fn delete(&self, id: Id) -> Result<Option<Fields>, StorageError>;

    /// Remove every record. Returns how many were removed.
    async fn delete_all(&self) -> Result<u64, StorageError>;
}
