//! Generated CRUD handlers: create, list, read, update, delete, delete-all.
//!
//! Every handler is generic over the storage model and the three schemas, so
//! one set of functions serves every resource.

use crate::error::AppError;
use crate::pagination::{compute_window, PageQuery};
use crate::response::{success_many, success_one, Encoded};
use crate::schema::{self, Schema};
use crate::state::ResourceState;
use crate::store::{Id, Storage};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, Query, State},
    http::StatusCode,
};
use std::collections::HashMap;

fn parse_id(id_str: &str) -> Result<Id, AppError> {
    id_str
        .parse::<Id>()
        .map_err(|_| AppError::Validation(format!("id must be an integer, got '{}'", id_str)))
}

fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, AppError> {
    body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::Validation(rejection.body_text())
        }
    })
}

pub async fn create<M, R, C, U>(
    State(config): State<ResourceState<M, R, C, U>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Encoded, AppError>
where
    M: Storage,
    R: Schema,
    C: Schema,
    U: Schema,
{
    let input: C = schema::decode(&read_body(body)?)?;
    let mut fields = schema::to_fields(&input)?;
    let model = config.model();
    fields.remove(model.id_field());
    let stored = model.create(fields).await?;
    let record: R = schema::from_fields(stored)?;
    tracing::debug!(resource = %config.prefix(), "created");
    success_one(&record)
}

pub async fn list<M, R, C, U>(
    State(config): State<ResourceState<M, R, C, U>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Encoded, AppError>
where
    M: Storage,
    R: Schema,
    C: Schema,
    U: Schema,
{
    let window = compute_window(&PageQuery::from_params(&params)?, config.page_size())?;
    tracing::debug!(resource = %config.prefix(), skip = window.skip, limit = window.limit, "list");
    let rows = config.model().list(window).await?;
    let records = rows
        .into_iter()
        .map(schema::from_fields::<R>)
        .collect::<Result<Vec<_>, _>>()?;
    success_many(&records)
}

pub async fn read<M, R, C, U>(
    State(config): State<ResourceState<M, R, C, U>>,
    Path(id_str): Path<String>,
) -> Result<Encoded, AppError>
where
    M: Storage,
    R: Schema,
    C: Schema,
    U: Schema,
{
    let id = parse_id(&id_str)?;
    tracing::debug!(resource = %config.prefix(), id, "read");
    let row = config.model().get(id).await?.ok_or_else(AppError::not_found)?;
    let record: R = schema::from_fields(row)?;
    success_one(&record)
}

/// PUT and PATCH: fields present in the payload overwrite, the rest are kept.
/// Null values are dropped before the merge, so a nullable field cannot be
/// cleared through this route. A payload `id` is ignored.
pub async fn update<M, R, C, U>(
    State(config): State<ResourceState<M, R, C, U>>,
    Path(id_str): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Encoded, AppError>
where
    M: Storage,
    R: Schema,
    C: Schema,
    U: Schema,
{
    let id = parse_id(&id_str)?;
    let model = config.model();
    if model.get(id).await?.is_none() {
        return Err(AppError::not_found());
    }
    let input: U = schema::decode(&read_body(body)?)?;
    let mut fields = schema::to_fields(&input)?;
    schema::strip_nulls(&mut fields);
    fields.remove(model.id_field());
    tracing::debug!(resource = %config.prefix(), id, fields = fields.len(), "update");
    // The row can vanish between the lookup and the write.
    let row = model.update(id, fields).await?.ok_or_else(AppError::not_found)?;
    let record: R = schema::from_fields(row)?;
    success_one(&record)
}

/// Responds with the record as it was before deletion.
pub async fn delete_one<M, R, C, U>(
    State(config): State<ResourceState<M, R, C, U>>,
    Path(id_str): Path<String>,
) -> Result<Encoded, AppError>
where
    M: Storage,
    R: Schema,
    C: Schema,
    U: Schema,
{
    let id = parse_id(&id_str)?;
    let model = config.model();
    if model.get(id).await?.is_none() {
        return Err(AppError::not_found());
    }
    let row = model.delete(id).await?.ok_or_else(AppError::not_found)?;
    let record: R = schema::from_fields(row)?;
    tracing::debug!(resource = %config.prefix(), id, "deleted");
    success_one(&record)
}

/// Unconditional; always answers with an empty array.
pub async fn delete_all<M, R, C, U>(
    State(config): State<ResourceState<M, R, C, U>>,
) -> Result<Encoded, AppError>
where
    M: Storage,
    R: Schema,
    C: Schema,
    U: Schema,
{
    let removed = config.model().delete_all().await?;
    tracing::debug!(resource = %config.prefix(), removed, "deleted all");
    success_many::<R>(&[])
}
