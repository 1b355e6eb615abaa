pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

pub mod mock;

use std::str::FromStr;
use std::time::Duration;

use eyre::{Result, WrapErr};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub use store::{SqliteAppointmentStore, SqliteCatalog};

pub type DbPool = SqlitePool;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a pool on a file database, creating the file if needed.
///
/// WAL lets readers proceed while one writer holds the lock; the busy timeout makes
/// competing writers queue instead of failing immediately.
pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .wrap_err_with(|| format!("Invalid DATABASE_URL: {}", database_url))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
