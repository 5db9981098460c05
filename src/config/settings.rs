//! Process settings from the environment (and `.env` when present).

use crate::config::resource::{DEFAULT_BODY_LIMIT, DEFAULT_PAGE_SIZE};
use crate::config::validator::validate_page_size;
use crate::error::ConfigError;
use std::collections::HashMap;
use std::str::FromStr;

pub const ENV_BIND_ADDR: &str = "CRUD_BIND_ADDR";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_DB_SCHEMA: &str = "CRUD_DB_SCHEMA";
pub const ENV_PAGE_SIZE: &str = "CRUD_PAGE_SIZE";
pub const ENV_BODY_LIMIT: &str = "CRUD_BODY_LIMIT";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    /// No database URL means resources are served from memory.
    pub database_url: Option<String>,
    pub db_schema: String,
    pub page_size: usize,
    pub body_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bind_addr: "127.0.0.1:3000".into(),
            database_url: None,
            db_schema: "public".into(),
            page_size: DEFAULT_PAGE_SIZE,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl Settings {
    /// Load `.env` (if any), then read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars().collect())
    }

    /// Build settings from an explicit variable map; unset keys keep their defaults.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());
        let page_size = match get(ENV_PAGE_SIZE) {
            Some(raw) => validate_page_size(parse(ENV_PAGE_SIZE, raw)?)?,
            None => defaults.page_size,
        };
        let body_limit = match get(ENV_BODY_LIMIT) {
            Some(raw) => parse(ENV_BODY_LIMIT, raw)?,
            None => defaults.body_limit,
        };
        Ok(Settings {
            bind_addr: get(ENV_BIND_ADDR).map(str::to_string).unwrap_or(defaults.bind_addr),
            database_url: get(ENV_DATABASE_URL).map(str::to_string),
            db_schema: get(ENV_DB_SCHEMA).map(str::to_string).unwrap_or(defaults.db_schema),
            page_size,
            body_limit,
        })
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::Load(format!("{} must be a non-negative integer, got '{}'", key, raw)))
}
