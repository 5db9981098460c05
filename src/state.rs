//! Shared state handed to every generated handler of one resource.

use crate::config::ResourceConfig;
use std::sync::Arc;

/// Read-only for the process lifetime; cloning only bumps the refcount.
pub type ResourceState<M, R, C, U> = Arc<ResourceConfig<M, R, C, U>>;
