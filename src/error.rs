//! Typed errors and HTTP mapping.

use crate::store::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Detail sent for every fault the client cannot act on.
pub const INTERNAL_DETAIL: &str = "Internal Server Error";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid prefix '{0}': must be a non-empty path starting with '/'")]
    InvalidPrefix(String),
    #[error("invalid page size {0}: must be at least 1")]
    InvalidPageSize(usize),
    #[error("resource '{0}' has no storage model")]
    MissingModel(String),
    #[error("duplicate resource prefix: {0}")]
    DuplicatePrefix(String),
    #[error("config load: {0}")]
    Load(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("request body too large")]
    PayloadTooLarge,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("internal: {0}")]
    Internal(String),
}

/// Body of every error response: `{"statusCode": 404, "detail": "Item not found"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status_code: u16,
    pub detail: String,
}

impl AppError {
    pub fn not_found() -> Self {
        AppError::NotFound("Item not found".into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Storage(StorageError::Conflict(_)) => StatusCode::CONFLICT,
            AppError::Config(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing envelope. Storage and internal faults are reduced to a
    /// fixed message; only validation and lookup failures carry their text.
    pub fn envelope(&self) -> ErrorEnvelope {
        let status = self.status();
        let detail = match self {
            AppError::NotFound(_) | AppError::Validation(_) | AppError::PayloadTooLarge => self.to_string(),
            AppError::Storage(StorageError::Conflict(_)) => "Integrity conflict".to_string(),
            AppError::Config(_) | AppError::Storage(_) | AppError::Internal(_) => INTERNAL_DETAIL.to_string(),
        };
        ErrorEnvelope {
            status_code: status.as_u16(),
            detail,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else if status == StatusCode::CONFLICT {
            tracing::warn!(error = %self, "request conflicted");
        }
        (status, Json(self.envelope())).into_response()
    }
}
