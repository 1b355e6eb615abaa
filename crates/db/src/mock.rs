use std::str::FromStr;

use eyre::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::DbPool;

/// A fresh in-memory database with the schema applied.
///
/// Every connection to `:memory:` is its own database, so the pool is pinned to a
/// single connection that is never recycled.
pub async fn create_test_pool() -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    crate::schema::initialize_database(&pool).await?;
    Ok(pool)
}
