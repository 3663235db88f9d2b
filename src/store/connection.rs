/// Connection factory for the project store
///
/// Every logical operation opens its own connection and drops it when done.
/// Nothing here holds an open handle between calls.

use crate::store::error::{Result, StorageError};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
    ConnectOptions, SqliteConnection,
};
use std::path::Path;
use std::time::Duration;

/// Opens a fresh connection to the store on each call
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    async fn connect(&self) -> Result<SqliteConnection>;
}

/// SQLite-backed provider holding only connect options
#[derive(Debug, Clone)]
pub struct SqliteConnectionProvider {
    options: SqliteConnectOptions,
}

impl SqliteConnectionProvider {
    /// Provider for an on-disk database file, created on first connect
    pub fn new(db_path: impl AsRef<Path>, busy_timeout: Duration) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(db_path.as_ref())
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(busy_timeout);
        Self { options }
    }

    /// Provider from prebuilt options
    pub fn with_options(options: SqliteConnectOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl ConnectionProvider for SqliteConnectionProvider {
    async fn connect(&self) -> Result<SqliteConnection> {
        let conn = self
            .options
            .connect()
            .await
            .map_err(StorageError::connectivity)?;
        tracing::debug!("🔌 Opened project store connection");
        Ok(conn)
    }
}
