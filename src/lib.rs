/// Workbench: home-improvement project tracker
///
/// Persists project aggregates (materials, ordered steps, categories) in
/// SQLite with one explicit transaction per operation, and serves them over a
/// small REST API.

// Core configuration and setup
pub mod config;

// Relational store plumbing - connections, units of work, schema, errors
pub mod store;

// Project aggregate - types, transactional repository, service facade
pub mod project;

// HTTP API layer - REST endpoints for project management
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use project::{Category, Hours, Material, Project, ProjectChanges, ProjectService, Step};
pub use server::start_server;
pub use store::{StorageError, StorageErrorKind};
