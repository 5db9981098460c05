//! Offset/limit windows for list requests.

use crate::error::AppError;
use std::collections::HashMap;

/// Slice of a collection returned by one list request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationRequest {
    pub skip: u64,
    pub limit: u64,
}

/// Raw pagination parameters from the query string, before bounds checks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    /// Zero-based page index; an alternative to `skip`.
    pub page: Option<i64>,
}

impl PageQuery {
    /// Pick `skip`, `limit` and `page` out of query params; other keys are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, AppError> {
        Ok(PageQuery {
            skip: parse_param(params, "skip")?,
            limit: parse_param(params, "limit")?,
            page: parse_param(params, "page")?,
        })
    }
}

fn parse_param(params: &HashMap<String, String>, key: &str) -> Result<Option<i64>, AppError> {
    match params.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{} must be an integer", key))),
    }
}

/// Compute the window for a list request.
///
/// `limit` defaults to `page_size` but a larger caller-supplied limit is
/// honored as-is.
pub fn compute_window(query: &PageQuery, page_size: usize) -> Result<PaginationRequest, AppError> {
    let limit = match query.limit {
        None => page_size as u64,
        Some(n) if n <= 0 => {
            return Err(AppError::Validation("limit must be greater than 0".into()));
        }
        Some(n) => n as u64,
    };
    let skip = match (query.skip, query.page) {
        (Some(_), Some(_)) => {
            return Err(AppError::Validation("skip and page cannot be combined".into()));
        }
        (Some(n), None) if n < 0 => {
            return Err(AppError::Validation("skip must not be negative".into()));
        }
        (Some(n), None) => n as u64,
        (None, Some(p)) if p < 0 => {
            return Err(AppError::Validation("page must not be negative".into()));
        }
        (None, Some(p)) => (p as u64).saturating_mul(limit),
        (None, None) => 0,
    };
    Ok(PaginationRequest { skip, limit })
}
