//! CRUD routes generated from one resource config.

use crate::config::ResourceConfig;
use crate::handlers::resource::{create, delete_all, delete_one, list, read, update};
use crate::schema::Schema;
use crate::state::ResourceState;
use crate::store::Storage;
use axum::{extract::DefaultBodyLimit, http::Method, routing::get, Router};
use std::sync::Arc;

/// The standard operations every resource exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Read,
    Update,
    Delete,
    DeleteAll,
}

impl Operation {
    pub fn summary(self) -> &'static str {
        match self {
            Operation::Create => "Create one",
            Operation::List => "List all",
            Operation::Read => "Get one",
            Operation::Update => "Update one",
            Operation::Delete => "Delete one",
            Operation::DeleteAll => "Delete all",
        }
    }

    pub fn is_member(self) -> bool {
        matches!(self, Operation::Read | Operation::Update | Operation::Delete)
    }

    pub fn has_body(self) -> bool {
        matches!(self, Operation::Create | Operation::Update)
    }
}

/// One method + path pair registered for a resource, in `{id}` template form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteSpec {
    pub method: Method,
    pub path: String,
    pub operation: Operation,
}

/// Every route `crud_router` registers under `prefix` (the trailing-slash
/// alias of the collection path is not listed separately).
pub fn route_specs(prefix: &str) -> Vec<RouteSpec> {
    let collection = prefix.to_string();
    let member = format!("{}/{{id}}", prefix);
    [
        (Method::POST, &collection, Operation::Create),
        (Method::GET, &collection, Operation::List),
        (Method::DELETE, &collection, Operation::DeleteAll),
        (Method::GET, &member, Operation::Read),
        (Method::PUT, &member, Operation::Update),
        (Method::PATCH, &member, Operation::Update),
        (Method::DELETE, &member, Operation::Delete),
    ]
    .into_iter()
    .map(|(method, path, operation)| RouteSpec {
        method,
        path: path.clone(),
        operation,
    })
    .collect()
}

/// Build the six CRUD routes for `config`. The returned router owns the
/// config; the caller decides where to merge or nest it.
pub fn crud_router<M, R, C, U>(config: ResourceConfig<M, R, C, U>) -> Router
where
    M: Storage,
    R: Schema,
    C: Schema,
    U: Schema,
{
    let prefix = config.prefix().to_string();
    let body_limit = config.body_limit();
    let state: ResourceState<M, R, C, U> = Arc::new(config);

    let collection = get(list::<M, R, C, U>)
        .post(create::<M, R, C, U>)
        .delete(delete_all::<M, R, C, U>);
    let member = get(read::<M, R, C, U>)
        .put(update::<M, R, C, U>)
        .patch(update::<M, R, C, U>)
        .delete(delete_one::<M, R, C, U>);

    tracing::debug!(prefix = %prefix, "registering crud routes");
    Router::new()
        .route(&prefix, collection.clone())
        .route(&format!("{}/", prefix), collection)
        .route(&format!("{}/:id", prefix), member)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
