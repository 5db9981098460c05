//! Builds parameterized INSERT, SELECT, UPDATE, DELETE for a [`TableSpec`].

use super::table::{ColumnSpec, TableSpec};
use crate::pagination::PaginationRequest;
use crate::store::{Fields, Id};
use serde_json::Value;

/// Quote identifier for PostgreSQL (safe: only from the table description).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
fn qualified_table(table: &TableSpec) -> String {
    format!("{}.{}", quoted(&table.schema_name), quoted(&table.table_name))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// `$n`, with a cast when the column declares a type.
fn placeholder(column: &ColumnSpec, n: usize) -> String {
    column
        .pg_type
        .as_deref()
        .map(|t| format!("${}::{}", n, t))
        .unwrap_or_else(|| format!("${}", n))
}

/// id first, then data columns. Custom enum (schema.typename) and numeric
/// columns are read back as text so row decoding stays lossless.
fn select_column_list(table: &TableSpec) -> String {
    let mut cols = vec![quoted(&table.id_column)];
    cols.extend(table.columns.iter().map(|c| {
        let q = quoted(&c.name);
        let pg_type = c.pg_type.as_deref().unwrap_or("");
        if pg_type.contains('.') || pg_type == "numeric" {
            format!("{}::text AS {}", q, q)
        } else {
            q
        }
    }));
    cols.join(", ")
}

/// SELECT one row by id.
pub fn select_by_id(table: &TableSpec, id: Id) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        select_column_list(table),
        qualified_table(table),
        quoted(&table.id_column),
        n
    );
    q
}

/// SELECT a window ordered by id, which is insertion order for a serial key.
pub fn select_list(table: &TableSpec, window: PaginationRequest) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {} LIMIT {} OFFSET {}",
        select_column_list(table),
        qualified_table(table),
        quoted(&table.id_column),
        window.limit.min(i64::MAX as u64),
        window.skip.min(i64::MAX as u64)
    );
    q
}

/// INSERT known columns from `fields`; the id is always left to the sequence.
/// Columns with a DB default are omitted when the payload does not set them.
pub fn insert(table: &TableSpec, fields: &Fields) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in &table.columns {
        let val = fields.get(&c.name).cloned();
        if val.is_none() && c.default.is_some() {
            continue;
        }
        let n = q.push_param(val.unwrap_or(Value::Null));
        cols.push(quoted(&c.name));
        placeholders.push(placeholder(c, n));
    }
    let returning = select_column_list(table);
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", qualified_table(table), returning)
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            qualified_table(table),
            cols.join(", "),
            placeholders.join(", "),
            returning
        )
    };
    q
}

/// UPDATE by id: SET only known columns present in `fields`. With nothing to
/// set this degrades to a SELECT so the caller still gets the row back.
pub fn update(table: &TableSpec, id: Id, fields: &Fields) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for c in &table.columns {
        let Some(v) = fields.get(&c.name) else { continue };
        let n = q.push_param(v.clone());
        sets.push(format!("{} = {}", quoted(&c.name), placeholder(c, n)));
    }
    if sets.is_empty() {
        return select_by_id(table, id);
    }
    let id_param = q.push_param(Value::from(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        qualified_table(table),
        sets.join(", "),
        quoted(&table.id_column),
        id_param,
        select_column_list(table)
    );
    q
}

/// DELETE by id, returning the removed row.
pub fn delete(table: &TableSpec, id: Id) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${} RETURNING {}",
        qualified_table(table),
        quoted(&table.id_column),
        n,
        select_column_list(table)
    );
    q
}

pub fn delete_all(table: &TableSpec) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("DELETE FROM {}", qualified_table(table));
    q
}

/// CREATE SCHEMA and CREATE TABLE, both IF NOT EXISTS.
pub fn create_table(table: &TableSpec) -> Vec<String> {
    let mut defs = vec![format!("{} BIGSERIAL PRIMARY KEY", quoted(&table.id_column))];
    for c in &table.columns {
        let mut def = format!("{} {}", quoted(&c.name), c.pg_type.as_deref().unwrap_or("TEXT"));
        if !c.nullable {
            def.push_str(" NOT NULL");
        }
        if let Some(expr) = &c.default {
            def.push_str(" DEFAULT ");
            def.push_str(expr);
        }
        defs.push(def);
    }
    vec![
        format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(&table.schema_name)),
        format!("CREATE TABLE IF NOT EXISTS {} ({})", qualified_table(table), defs.join(", ")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items() -> TableSpec {
        TableSpec::new("public", "items")
            .column(ColumnSpec::text("name"))
            .column(ColumnSpec::typed("created_at", "timestamptz").with_default("NOW()"))
    }

    fn fields(v: Value) -> Fields {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn select_by_id_binds_id() {
        let q = select_by_id(&items(), 4);
        assert_eq!(
            q.sql,
            r#"SELECT "id", "name", "created_at" FROM "public"."items" WHERE "id" = $1"#
        );
        assert_eq!(q.params, vec![json!(4)]);
    }

    #[test]
    fn list_orders_by_id_with_window() {
        let q = select_list(&items(), PaginationRequest { skip: 20, limit: 10 });
        assert!(q.sql.ends_with(r#"ORDER BY "id" LIMIT 10 OFFSET 20"#), "{}", q.sql);
        assert!(q.params.is_empty());
    }

    #[test]
    fn insert_skips_id_and_defaulted_columns() {
        let q = insert(&items(), &fields(json!({ "id": 9, "name": "First", "extra": 1 })));
        assert_eq!(
            q.sql,
            r#"INSERT INTO "public"."items" ("name") VALUES ($1) RETURNING "id", "name", "created_at""#
        );
        assert_eq!(q.params, vec![json!("First")]);
    }

    #[test]
    fn insert_casts_typed_columns() {
        let q = insert(&items(), &fields(json!({ "name": "a", "created_at": "2024-01-01T00:00:00Z" })));
        assert!(q.sql.contains("VALUES ($1, $2::timestamptz)"), "{}", q.sql);
    }

    #[test]
    fn update_sets_only_present_columns() {
        let q = update(&items(), 3, &fields(json!({ "name": "Updated" })));
        assert_eq!(
            q.sql,
            r#"UPDATE "public"."items" SET "name" = $1 WHERE "id" = $2 RETURNING "id", "name", "created_at""#
        );
        assert_eq!(q.params, vec![json!("Updated"), json!(3)]);
    }

    #[test]
    fn empty_update_reads_row() {
        let q = update(&items(), 3, &Fields::new());
        assert!(q.sql.starts_with("SELECT"));
        assert_eq!(q.params, vec![json!(3)]);
    }

    #[test]
    fn identifiers_are_quoted() {
        let table = TableSpec::new("app", "we\"ird").column(ColumnSpec::text("name"));
        assert_eq!(delete_all(&table).sql, r#"DELETE FROM "app"."we""ird""#);
    }

    #[test]
    fn custom_id_column_keys_member_queries() {
        let table = items().id_column("item_id");
        let q = delete(&table, 5);
        assert!(q.sql.contains(r#"WHERE "item_id" = $1"#), "{}", q.sql);
        assert!(create_table(&table)[1].contains(r#"("item_id" BIGSERIAL PRIMARY KEY"#));
    }

    #[test]
    fn ddl_uses_bigserial_id() {
        let ddl = create_table(&items());
        assert_eq!(ddl[0], r#"CREATE SCHEMA IF NOT EXISTS "public""#);
        assert_eq!(
            ddl[1],
            r#"CREATE TABLE IF NOT EXISTS "public"."items" ("id" BIGSERIAL PRIMARY KEY, "name" TEXT NOT NULL, "created_at" timestamptz NOT NULL DEFAULT NOW())"#
        );
    }
}
