//! Read-only introspection of the PostgreSQL catalog.

pub mod repo;
pub mod repo_types;

pub use repo_types::{AppliedVersion, ColumnInfo, IndexInfo};
