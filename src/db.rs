use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::error::{Error, Result};

/// Open a single-connection pool. Any failure, including a malformed URL,
/// is a [`Error::ConnectionFailure`].
pub async fn connect(database_url: &str, timeout: Option<Duration>) -> Result<PgPool> {
    let mut options = PgPoolOptions::new().max_connections(1);
    if let Some(timeout) = timeout {
        options = options.acquire_timeout(timeout);
    }
    let pool = options
        .connect(database_url)
        .await
        .map_err(Error::ConnectionFailure)?;
    info!("connected to database");
    Ok(pool)
}
