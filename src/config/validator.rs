//! Config validation: prefix shape and pagination bounds.

use crate::error::ConfigError;
use regex::Regex;
use std::sync::OnceLock;

fn prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(/[A-Za-z0-9_.~-]+)+$").expect("prefix pattern is valid"))
}

/// Normalize and check a URL prefix. A single trailing slash is dropped, so
/// "/items/" and "/items" are the same resource.
pub fn validate_prefix(prefix: &str) -> Result<String, ConfigError> {
    let trimmed = prefix.trim();
    let normalized = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if !prefix_pattern().is_match(normalized) {
        return Err(ConfigError::InvalidPrefix(prefix.to_string()));
    }
    Ok(normalized.to_string())
}

pub fn validate_page_size(page_size: usize) -> Result<usize, ConfigError> {
    if page_size < 1 {
        return Err(ConfigError::InvalidPageSize(page_size));
    }
    Ok(page_size)
}
