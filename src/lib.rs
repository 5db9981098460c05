//! crud-router: configuration-driven CRUD route generator for axum.

pub mod config;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod pagination;
pub mod response;
pub mod routes;
pub mod schema;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{ResourceConfig, ResourceConfigBuilder, Settings, DEFAULT_PAGE_SIZE};
pub use error::{AppError, ConfigError, ErrorEnvelope};
pub use pagination::{compute_window, PageQuery, PaginationRequest};
pub use routes::{common_routes, crud_router, ResourceSet};
pub use schema::{decode, encode, Schema};
pub use sql::{ColumnSpec, TableSpec};
pub use store::{Fields, MemoryStore, PgStore, Storage, StorageError};
