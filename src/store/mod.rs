/// Relational store plumbing
///
/// Connection factory, unit-of-work transaction boundary, schema bootstrap and
/// the storage error taxonomy shared by the project layer.

pub mod connection;
pub mod error;
pub mod schema;
pub mod unit_of_work;

pub use connection::{ConnectionProvider, SqliteConnectionProvider};
pub use error::{StorageError, StorageErrorKind};
pub use unit_of_work::{Mutation, UnitOfWork};
