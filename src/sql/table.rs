//! Description of the PostgreSQL table backing one resource.

/// One non-id column.
#[derive(Clone, Debug)]
pub struct ColumnSpec {
    pub name: String,
    /// PostgreSQL type used for DDL and as a bind cast (e.g. "timestamptz").
    /// None means TEXT with no cast.
    pub pg_type: Option<String>,
    pub nullable: bool,
    /// SQL default expression (e.g. "NOW()"); an insert omits the column when
    /// the payload does not set it.
    pub default: Option<String>,
}

impl ColumnSpec {
    pub fn text(name: impl Into<String>) -> Self {
        ColumnSpec {
            name: name.into(),
            pg_type: None,
            nullable: false,
            default: None,
        }
    }

    pub fn typed(name: impl Into<String>, pg_type: impl Into<String>) -> Self {
        ColumnSpec {
            pg_type: Some(pg_type.into()),
            ..Self::text(name)
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_default(mut self, expression: impl Into<String>) -> Self {
        self.default = Some(expression.into());
        self
    }
}

/// Table with a BIGSERIAL id column and a fixed set of data columns.
#[derive(Clone, Debug)]
pub struct TableSpec {
    pub schema_name: String,
    pub table_name: String,
    pub id_column: String,
    pub columns: Vec<ColumnSpec>,
}

impl TableSpec {
    pub fn new(schema_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        TableSpec {
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            id_column: "id".into(),
            columns: Vec::new(),
        }
    }

    pub fn id_column(mut self, name: impl Into<String>) -> Self {
        self.id_column = name.into();
        self
    }

    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }
}
