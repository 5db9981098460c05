//! Per-resource configuration: storage model, schema types, prefix, tags, page size.

use crate::config::validator::{validate_page_size, validate_prefix};
use crate::error::ConfigError;
use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Page size used when the builder is not given one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Request body cap used when the builder is not given one (1 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Immutable description of one resource.
///
/// `M` is the storage model; `R`, `C` and `U` are the read, create and
/// update schemas. Built once at assembly time through [`ResourceConfig::builder`].
pub struct ResourceConfig<M, R, C, U> {
    model: Arc<M>,
    prefix: String,
    tags: BTreeSet<String>,
    page_size: usize,
    body_limit: usize,
    _schemas: PhantomData<fn() -> (R, C, U)>,
}

impl<M, R, C, U> ResourceConfig<M, R, C, U> {
    pub fn builder() -> ResourceConfigBuilder<M, R, C, U> {
        ResourceConfigBuilder::default()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Normalized prefix, without a trailing slash.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }
}

impl<M, R, C, U> fmt::Debug for ResourceConfig<M, R, C, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceConfig")
            .field("prefix", &self.prefix)
            .field("tags", &self.tags)
            .field("page_size", &self.page_size)
            .field("body_limit", &self.body_limit)
            .finish_non_exhaustive()
    }
}

pub struct ResourceConfigBuilder<M, R, C, U> {
    model: Option<Arc<M>>,
    prefix: String,
    tags: BTreeSet<String>,
    page_size: usize,
    body_limit: usize,
    _schemas: PhantomData<fn() -> (R, C, U)>,
}

impl<M, R, C, U> Default for ResourceConfigBuilder<M, R, C, U> {
    fn default() -> Self {
        ResourceConfigBuilder {
            model: None,
            prefix: String::new(),
            tags: BTreeSet::new(),
            page_size: DEFAULT_PAGE_SIZE,
            body_limit: DEFAULT_BODY_LIMIT,
            _schemas: PhantomData,
        }
    }
}

impl<M, R, C, U> ResourceConfigBuilder<M, R, C, U> {
    pub fn model(mut self, model: Arc<M>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    pub fn build(self) -> Result<ResourceConfig<M, R, C, U>, ConfigError> {
        let prefix = validate_prefix(&self.prefix)?;
        let page_size = validate_page_size(self.page_size)?;
        let model = self.model.ok_or_else(|| ConfigError::MissingModel(prefix.clone()))?;
        Ok(ResourceConfig {
            model,
            prefix,
            tags: self.tags,
            page_size,
            body_limit: self.body_limit,
            _schemas: PhantomData,
        })
    }
}
