use sqlx::FromRow;

/// One row of `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
    pub character_maximum_length: Option<i32>,
    pub is_nullable: bool,
    pub column_default: Option<String>,
}

impl ColumnInfo {
    /// Type as written in DDL, e.g. `character varying(255)`.
    pub fn display_type(&self) -> String {
        match self.character_maximum_length {
            Some(len) => format!("{}({})", self.data_type, len),
            None => self.data_type.clone(),
        }
    }
}

/// One row of `pg_indexes`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct IndexInfo {
    pub indexname: String,
    pub indexdef: String,
}

impl IndexInfo {
    pub fn is_unique(&self) -> bool {
        self.indexdef.starts_with("CREATE UNIQUE INDEX")
    }
}

/// Latest version recorded by the migration tool.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AppliedVersion {
    pub version: String,
    pub description: Option<String>,
}
