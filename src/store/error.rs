/// Storage error taxonomy
///
/// Every failure that leaves the persistence layer is a `StorageError` carrying a
/// kind and, when there is one, the underlying cause. Driver types never escape.

use std::fmt;
use thiserror::Error;

/// Boxed underlying cause kept on a `StorageError`
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias for the persistence layer
pub type Result<T> = std::result::Result<T, StorageError>;

/// What went wrong, independent of the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageErrorKind {
    /// A connection to the store could not be established
    Connectivity,
    /// Malformed statement, parameter binding or row decoding
    Statement,
    /// The targeted row does not exist
    NotFound,
    /// An insert touched no rows or produced no generated key
    InsertionFailed,
    /// A sub-fetch failed while assembling a project aggregate
    AggregateAssembly,
    /// Rolling back a failed unit of work failed as well
    RollbackFailed,
    /// Schema bootstrap failed
    Schema,
}

impl StorageErrorKind {
    /// Stable snake_case code, used in logs and API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connectivity => "connectivity_error",
            Self::Statement => "statement_error",
            Self::NotFound => "not_found",
            Self::InsertionFailed => "insertion_failed",
            Self::AggregateAssembly => "aggregate_assembly_error",
            Self::RollbackFailed => "rollback_failed",
            Self::Schema => "schema_error",
        }
    }
}

impl fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every repository and service operation
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct StorageError {
    kind: StorageErrorKind,
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl StorageError {
    /// Build an error without an underlying cause
    pub fn new(kind: StorageErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Build an error that preserves the original cause
    pub fn with_cause(
        kind: StorageErrorKind,
        message: impl Into<String>,
        cause: impl Into<BoxError>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn connectivity(cause: sqlx::Error) -> Self {
        Self::with_cause(
            StorageErrorKind::Connectivity,
            "failed to connect to the project store",
            cause,
        )
    }

    pub fn statement(cause: sqlx::Error) -> Self {
        Self::with_cause(StorageErrorKind::Statement, "statement failed", cause)
    }

    pub fn not_found(what: &str, id: i64) -> Self {
        Self::new(
            StorageErrorKind::NotFound,
            format!("{} with ID {} does not exist", what, id),
        )
    }

    pub fn insertion_failed(message: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::InsertionFailed, message)
    }

    /// Re-tag a sub-fetch failure, keeping the original error as the cause
    pub fn aggregate_assembly(project_id: i64, cause: StorageError) -> Self {
        Self::with_cause(
            StorageErrorKind::AggregateAssembly,
            format!("failed to assemble project {}", project_id),
            cause,
        )
    }

    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }
}
