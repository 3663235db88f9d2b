/// HTTP API Layer
///
/// REST endpoints over the project service:
/// - Project CRUD operations
/// - Storage error to HTTP status mapping

// Project management endpoints (POST/GET/PUT/PATCH/DELETE)
pub mod projects;

// Error responses
pub mod error;

pub use error::ApiError;
pub use projects::{create_project_routes, AppState};
