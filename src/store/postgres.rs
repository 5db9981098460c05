//! PostgreSQL-backed store built on the parameterized SQL builder.

use super::{Fields, Id, Storage, StorageError};
use crate::pagination::PaginationRequest;
use crate::sql::{self, PgBindValue, QueryBuf, TableSpec};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::postgres::PgRow;
use sqlx::PgPool;

/// SQLSTATE class for integrity constraint violations.
const INTEGRITY_CLASS: &str = "23";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    table: TableSpec,
}

impl PgStore {
    pub fn new(pool: PgPool, table: TableSpec) -> Self {
        PgStore { pool, table }
    }

    /// Create the schema and table when missing. Existing tables are left as-is.
    pub async fn ensure_table(&self) -> Result<(), StorageError> {
        for ddl in sql::create_table(&self.table) {
            tracing::debug!(sql = %ddl, "ddl");
            sqlx::query(&ddl).execute(&self.pool).await.map_err(map_db_error)?;
        }
        Ok(())
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Fields>, StorageError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from(p));
        }
        let row = query.fetch_optional(&self.pool).await.map_err(map_db_error)?;
        Ok(row.map(|r| row_to_fields(&r)))
    }

    async fn fetch_all(&self, q: &QueryBuf) -> Result<Vec<Fields>, StorageError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from(p));
        }
        let rows = query.fetch_all(&self.pool).await.map_err(map_db_error)?;
        Ok(rows.iter().map(row_to_fields).collect())
    }
}

#[async_trait]
impl Storage for PgStore {
    fn id_field(&self) -> &str {
        &self.table.id_column
    }

    async fn create(&self, fields: Fields) -> Result<Fields, StorageError> {
        let q = sql::insert(&self.table, &fields);
        self.fetch_optional(&q)
            .await?
            .ok_or_else(|| StorageError::Malformed("insert returned no row".into()))
    }

    async fn list(&self, window: PaginationRequest) -> Result<Vec<Fields>, StorageError> {
        self.fetch_all(&sql::select_list(&self.table, window)).await
    }

    async fn get(&self, id: Id) -> Result<Option<Fields>, StorageError> {
        self.fetch_optional(&sql::select_by_id(&self.table, id)).await
    }

    async fn update(&self, id: Id, fields: Fields) -> Result<Option<Fields>, StorageError> {
        self.fetch_optional(&sql::update(&self.table, id, &fields)).await
    }

    async fn delete(&self, id: Id) -> Result<Option<Fields>, StorageError> {
        self.fetch_optional(&sql::delete(&self.table, id)).await
    }

    async fn delete_all(&self) -> Result<u64, StorageError> {
        let q = sql::delete_all(&self.table);
        tracing::debug!(sql = %q.sql, "query");
        let done = sqlx::query(&q.sql).execute(&self.pool).await.map_err(map_db_error)?;
        Ok(done.rows_affected())
    }
}

fn is_integrity_violation(db: &dyn DatabaseError) -> bool {
    match db.kind() {
        ErrorKind::UniqueViolation
        | ErrorKind::ForeignKeyViolation
        | ErrorKind::NotNullViolation
        | ErrorKind::CheckViolation => true,
        _ => db.code().map_or(false, |code| code.starts_with(INTEGRITY_CLASS)),
    }
}

fn map_db_error(err: sqlx::Error) -> StorageError {
    let conflict = err.as_database_error().map_or(false, |db| is_integrity_violation(db));
    if conflict {
        StorageError::Conflict(err.to_string())
    } else {
        StorageError::Db(err)
    }
}

fn row_to_fields(row: &PgRow) -> Fields {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = Fields::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    map
}

fn cell_to_value(row: &PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n as f64) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(name) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(name) {
        return j;
    }
    Value::Null
}
