//! Encoded JSON responses for generated routes.

use crate::error::AppError;
use crate::schema::encode;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// A body already encoded by the schema adapter.
#[derive(Debug)]
pub struct Encoded {
    pub status: StatusCode,
    pub body: Bytes,
}

impl IntoResponse for Encoded {
    fn into_response(self) -> Response {
        let mut res = Response::new(Body::from(self.body));
        *res.status_mut() = self.status;
        res.headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        res
    }
}

/// 200 with one record.
pub fn success_one<T: Serialize>(record: &T) -> Result<Encoded, AppError> {
    Ok(Encoded {
        status: StatusCode::OK,
        body: encode(record)?,
    })
}

/// 200 with a (possibly empty) array of records.
pub fn success_many<T: Serialize>(records: &[T]) -> Result<Encoded, AppError> {
    Ok(Encoded {
        status: StatusCode::OK,
        body: encode(records)?,
    })
}
