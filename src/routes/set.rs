//! Compose several generated resources into one router.

use crate::config::ResourceConfig;
use crate::error::ConfigError;
use crate::openapi::{build_openapi, ResourceDoc};
use crate::routes::resource::crud_router;
use crate::schema::Schema;
use crate::store::Storage;
use axum::{routing::get, Json, Router};
use std::collections::HashSet;

/// Resources mounted so far, plus their documentation.
///
/// ```ignore
/// let app = ResourceSet::new()
///     .mount(items_config)?
///     .mount(users_config)?
///     .into_router();
/// ```
#[derive(Default)]
pub struct ResourceSet {
    router: Router,
    prefixes: HashSet<String>,
    docs: Vec<ResourceDoc>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one resource. Fails if another resource already uses its prefix.
    pub fn mount<M, R, C, U>(mut self, config: ResourceConfig<M, R, C, U>) -> Result<Self, ConfigError>
    where
        M: Storage,
        R: Schema,
        C: Schema,
        U: Schema,
    {
        let prefix = config.prefix().to_string();
        if !self.prefixes.insert(prefix.clone()) {
            return Err(ConfigError::DuplicatePrefix(prefix));
        }
        tracing::info!(prefix = %prefix, tags = ?config.tags(), page_size = config.page_size(), "mounted resource");
        self.docs.push(ResourceDoc {
            prefix,
            tags: config.tags().clone(),
        });
        self.router = self.router.merge(crud_router(config));
        Ok(self)
    }

    pub fn docs(&self) -> &[ResourceDoc] {
        &self.docs
    }

    pub fn openapi(&self) -> utoipa::openapi::OpenApi {
        build_openapi(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &self.docs)
    }

    /// All resource routes plus `GET /openapi.json`.
    pub fn into_router(self) -> Router {
        let doc = self.openapi();
        self.router
            .route("/openapi.json", get(move || async move { Json(doc) }))
    }
}
