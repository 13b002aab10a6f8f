use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Used when `DATABASE_URL` is not provided; connecting to it always fails.
pub const PLACEHOLDER_DATABASE_URL: &str = "your-database-url";

/// Which migration tool's bookkeeping table records the applied version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionTable {
    #[default]
    Sqlx,
    Alembic,
}

impl VersionTable {
    pub fn table_name(self) -> &'static str {
        match self {
            VersionTable::Sqlx => "_sqlx_migrations",
            VersionTable::Alembic => "alembic_version",
        }
    }
}

impl FromStr for VersionTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlx" | "_sqlx_migrations" => Ok(VersionTable::Sqlx),
            "alembic" | "alembic_version" => Ok(VersionTable::Alembic),
            other => Err(format!("unknown migration table {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub schema: String,
    pub version_table: VersionTable,
    pub rollback_sample: bool,
    /// How long to keep retrying the first connection; sqlx's default when `None`.
    pub connect_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: PLACEHOLDER_DATABASE_URL.into(),
            schema: "public".into(),
            version_table: VersionTable::default(),
            rollback_sample: false,
            connect_timeout: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            warn!("DATABASE_URL is not set; using placeholder");
            defaults.database_url.clone()
        });
        let schema = std::env::var("DATABASE_SCHEMA").unwrap_or(defaults.schema);
        let version_table = match std::env::var("MIGRATION_TABLE") {
            Ok(raw) => raw.parse().unwrap_or_else(|e: String| {
                warn!(error = %e, "falling back to default migration table");
                defaults.version_table
            }),
            Err(_) => defaults.version_table,
        };
        let rollback_sample = std::env::var("VERIFY_ROLLBACK_SAMPLE")
            .ok()
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.rollback_sample);
        let connect_timeout = std::env::var("DATABASE_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs);

        Self {
            database_url,
            schema,
            version_table,
            rollback_sample,
            connect_timeout,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
