//! The declared shape of the `users` table and comparison against the live catalog.
//!
//! This mirrors `migrations/*_create_users.sql`; the two must change together.

use std::fmt;

use crate::catalog::{ColumnInfo, IndexInfo};

pub const USERS_TABLE: &str = "users";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    /// As reported by `information_schema.columns.data_type`.
    pub data_type: &'static str,
    pub max_length: Option<i32>,
    pub nullable: bool,
    /// Server-side default expression, normalized.
    pub default: Option<&'static str>,
}

impl ColumnSpec {
    const fn new(name: &'static str, data_type: &'static str) -> Self {
        Self {
            name,
            data_type,
            max_length: None,
            nullable: false,
            default: None,
        }
    }

    const fn varchar(name: &'static str, len: i32) -> Self {
        Self {
            max_length: Some(len),
            ..Self::new(name, "character varying")
        }
    }

    const fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    const fn default(self, expr: &'static str) -> Self {
        Self {
            default: Some(expr),
            ..self
        }
    }

    pub fn display_type(&self) -> String {
        match self.max_length {
            Some(len) => format!("{}({})", self.data_type, len),
            None => self.data_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: &'static str,
    pub unique: bool,
}

/// Columns of `users`, in ordinal order.
pub const USERS_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("id", "uuid").default("gen_random_uuid()"),
    ColumnSpec::varchar("email", 255),
    ColumnSpec::varchar("username", 50),
    ColumnSpec::varchar("password_hash", 255),
    ColumnSpec::varchar("first_name", 100).nullable(),
    ColumnSpec::varchar("last_name", 100).nullable(),
    ColumnSpec::new("is_active", "boolean").default("true"),
    ColumnSpec::new("test", "boolean").default("true"),
    ColumnSpec::new("is_verified", "boolean").default("false"),
    ColumnSpec::new("created_at", "timestamp with time zone").default("now()"),
    ColumnSpec::new("updated_at", "timestamp with time zone").default("now()"),
];

pub const USERS_INDEXES: &[IndexSpec] = &[
    IndexSpec { name: "users_pkey", unique: true },
    IndexSpec { name: "ix_users_email", unique: true },
    IndexSpec { name: "ix_users_username", unique: true },
    IndexSpec { name: "idx_user_email_active", unique: false },
    IndexSpec { name: "idx_user_username_active", unique: false },
    IndexSpec { name: "idx_user_created_at", unique: false },
];

pub const USERS_TRIGGERS: &[&str] = &["users_touch_updated_at"];

/// A single difference between the declared schema and what the database holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    MissingTable(String),
    MissingColumn(String),
    UnexpectedColumn(String),
    ColumnOrder {
        expected: Vec<String>,
        found: Vec<String>,
    },
    ColumnType {
        column: String,
        expected: String,
        found: String,
    },
    Nullability {
        column: String,
        expected_nullable: bool,
    },
    Default {
        column: String,
        expected: Option<String>,
        found: Option<String>,
    },
    MissingIndex(String),
    IndexNotUnique(String),
    MissingTrigger(String),
    /// A value read back after a write is not what was written or defaulted.
    RoundTrip {
        field: String,
        expected: String,
        found: String,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::MissingTable(t) => write!(f, "table {t} not found"),
            Mismatch::MissingColumn(c) => write!(f, "missing column {c}"),
            Mismatch::UnexpectedColumn(c) => write!(f, "unexpected column {c}"),
            Mismatch::ColumnOrder { expected, found } => write!(
                f,
                "column order differs: expected [{}], found [{}]",
                expected.join(", "),
                found.join(", ")
            ),
            Mismatch::ColumnType {
                column,
                expected,
                found,
            } => write!(f, "column {column} has type {found}, expected {expected}"),
            Mismatch::Nullability {
                column,
                expected_nullable,
            } => {
                let want = if *expected_nullable { "NULL" } else { "NOT NULL" };
                write!(f, "column {column} should be {want}")
            }
            Mismatch::Default {
                column,
                expected,
                found,
            } => write!(
                f,
                "column {column} default is {}, expected {}",
                found.as_deref().unwrap_or("<none>"),
                expected.as_deref().unwrap_or("<none>")
            ),
            Mismatch::MissingIndex(i) => write!(f, "missing index {i}"),
            Mismatch::IndexNotUnique(i) => write!(f, "index {i} is not unique"),
            Mismatch::MissingTrigger(t) => write!(f, "missing trigger {t}"),
            Mismatch::RoundTrip {
                field,
                expected,
                found,
            } => write!(f, "{field} read back as {found}, expected {expected}"),
        }
    }
}

/// Reduce a catalog default expression to a comparable form:
/// `'true'::boolean` and `TRUE` both become `true`.
pub fn normalize_default(expr: &str) -> String {
    let mut s = expr.trim().to_ascii_lowercase();
    while let Some(idx) = s.rfind("::") {
        let cast = &s[idx + 2..];
        if cast.contains('(') || cast.contains(')') {
            break;
        }
        s.truncate(idx);
    }
    let s = s.trim();
    s.strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .unwrap_or(s)
        .to_string()
}

pub fn diff_columns(expected: &[ColumnSpec], found: &[ColumnInfo]) -> Vec<Mismatch> {
    let mut out = Vec::new();

    for spec in expected {
        if !found.iter().any(|c| c.column_name == spec.name) {
            out.push(Mismatch::MissingColumn(spec.name.to_string()));
        }
    }
    for col in found {
        if !expected.iter().any(|s| s.name == col.column_name) {
            out.push(Mismatch::UnexpectedColumn(col.column_name.clone()));
        }
    }
    if out.is_empty() {
        let in_order = expected
            .iter()
            .zip(found)
            .all(|(spec, col)| spec.name == col.column_name);
        if !in_order {
            out.push(Mismatch::ColumnOrder {
                expected: expected.iter().map(|s| s.name.to_string()).collect(),
                found: found.iter().map(|c| c.column_name.clone()).collect(),
            });
        }
    }

    for spec in expected {
        let Some(col) = found.iter().find(|c| c.column_name == spec.name) else {
            continue;
        };
        let (want, have) = (spec.display_type(), col.display_type());
        if want != have {
            out.push(Mismatch::ColumnType {
                column: spec.name.to_string(),
                expected: want,
                found: have,
            });
        }
        if spec.nullable != col.is_nullable {
            out.push(Mismatch::Nullability {
                column: spec.name.to_string(),
                expected_nullable: spec.nullable,
            });
        }
        let have_default = col.column_default.as_deref().map(normalize_default);
        if spec.default.map(normalize_default) != have_default {
            out.push(Mismatch::Default {
                column: spec.name.to_string(),
                expected: spec.default.map(str::to_string),
                found: col.column_default.clone(),
            });
        }
    }

    out
}

/// Extra indexes are allowed; missing ones and lost uniqueness are not.
pub fn diff_indexes(expected: &[IndexSpec], found: &[IndexInfo]) -> Vec<Mismatch> {
    expected
        .iter()
        .filter_map(|spec| match found.iter().find(|i| i.indexname == spec.name) {
            None => Some(Mismatch::MissingIndex(spec.name.to_string())),
            Some(idx) if spec.unique && !idx.is_unique() => {
                Some(Mismatch::IndexNotUnique(spec.name.to_string()))
            }
            Some(_) => None,
        })
        .collect()
}

pub fn diff_triggers(expected: &[&str], found: &[String]) -> Vec<Mismatch> {
    expected
        .iter()
        .filter(|name| !found.iter().any(|t| t == *name))
        .map(|name| Mismatch::MissingTrigger(name.to_string()))
        .collect()
}
