/// Explicit transaction boundary around one connection
///
/// A `UnitOfWork` is created Active by `begin`, and ends exactly once through
/// `commit` or `rollback`, both of which consume it. It holds the connection
/// mutably borrowed, so a second unit cannot be started on the same connection
/// while one is alive. Dropping an unfinished unit rolls it back.

use crate::store::error::{Result, StorageError, StorageErrorKind};
use sqlx::{
    query::Query,
    sqlite::{SqliteArguments, SqliteRow},
    Connection, Sqlite, SqliteConnection, Transaction,
};

/// Parameterized statement accepted by a unit of work
pub type Statement<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Outcome of a mutating statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    /// Rows the statement touched
    pub rows_affected: u64,
    /// Store-generated rowid; only meaningful for INSERT
    pub generated_key: Option<i64>,
}

/// One begin/commit-or-rollback scope
pub struct UnitOfWork<'c> {
    tx: Transaction<'c, Sqlite>,
}

impl<'c> UnitOfWork<'c> {
    /// Leave autocommit and open a transaction on `conn`
    pub async fn begin(conn: &'c mut SqliteConnection) -> Result<Self> {
        let tx = conn.begin().await.map_err(StorageError::statement)?;
        tracing::debug!("🔒 Unit of work started");
        Ok(Self { tx })
    }

    /// Run a mutating statement inside the transaction
    pub async fn execute(&mut self, statement: Statement<'_>) -> Result<Mutation> {
        let result = statement
            .execute(&mut *self.tx)
            .await
            .map_err(StorageError::statement)?;

        let rows_affected = result.rows_affected();
        let rowid = result.last_insert_rowid();
        let generated_key = (rows_affected > 0 && rowid > 0).then_some(rowid);

        Ok(Mutation {
            rows_affected,
            generated_key,
        })
    }

    /// Run a query and collect every row
    pub async fn fetch_all(&mut self, statement: Statement<'_>) -> Result<Vec<SqliteRow>> {
        statement
            .fetch_all(&mut *self.tx)
            .await
            .map_err(StorageError::statement)
    }

    /// Run a query expected to return at most one row
    pub async fn fetch_optional(&mut self, statement: Statement<'_>) -> Result<Option<SqliteRow>> {
        statement
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(StorageError::statement)
    }

    /// Flush all work and return the connection to autocommit
    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await.map_err(StorageError::statement)?;
        tracing::debug!("✅ Unit of work committed");
        Ok(())
    }

    /// Commit on `Ok`, roll back on `Err`; the unit ends either way
    pub async fn complete<T>(self, outcome: Result<T>) -> Result<T> {
        match outcome {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(e) => Err(self.rollback(e).await),
        }
    }

    /// Undo all work and hand back the failure that caused it.
    ///
    /// If the rollback itself fails the returned error is `RollbackFailed`,
    /// carrying the rollback failure as cause and naming the original one.
    pub async fn rollback(self, cause: StorageError) -> StorageError {
        match self.tx.rollback().await {
            Ok(()) => {
                tracing::warn!("↩️ Unit of work rolled back: {}", cause);
                cause
            }
            Err(rollback_err) => {
                tracing::error!(
                    "❌ Rollback failed ({}) while handling: {}",
                    rollback_err,
                    cause
                );
                StorageError::with_cause(
                    StorageErrorKind::RollbackFailed,
                    format!("rollback failed after: {}", cause),
                    rollback_err,
                )
            }
        }
    }
}
