/// Project management REST API endpoints
///
/// Thin handlers over `ProjectService`; every transactional concern lives in
/// the repository underneath.

use crate::api::error::ApiError;
use crate::project::{Project, ProjectChanges, ProjectId, ProjectService};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Project service facade
    pub service: ProjectService,
}

/// Response for update operations
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: ProjectId,
    pub message: String,
}

/// Create project management routes
pub fn create_project_routes() -> Router<AppState> {
    Router::new()
        .route("/api/projects", post(create_project).get(list_projects))
        .route(
            "/api/projects/{id}",
            get(get_project)
                .put(update_project)
                .patch(patch_project)
                .delete(delete_project),
        )
}

/// Create a new project
///
/// POST /api/projects
/// Body: { "name": "...", "estimated_hours": "2.5", "actual_hours": 0, "difficulty": 3, "notes": "..." }
async fn create_project(
    State(state): State<AppState>,
    Json(mut project): Json<Project>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    project.validate()?;
    // Ids are assigned by the store
    project.project_id = None;

    let project = state.service.add_project(project).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// List all projects, ordered by name
///
/// GET /api/projects
/// Returns: { "projects": [{ "project_id": 1, "name": "...", ... }] }
async fn list_projects(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let projects = state.service.fetch_all_projects().await?;
    Ok(Json(json!({ "projects": projects })))
}

/// Get a project with its materials, steps and categories
///
/// GET /api/projects/{id}
async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<Json<Project>, ApiError> {
    let project = state.service.fetch_project_by_id(id).await?;
    Ok(Json(project))
}

/// Replace every field of an existing project
///
/// PUT /api/projects/{id}
async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Json(mut project): Json<Project>,
) -> Result<Json<ProjectResponse>, ApiError> {
    // Ensure the project ID matches the URL parameter
    project.project_id = Some(id);
    project.validate()?;

    state.service.modify_project_details(&project).await?;

    Ok(Json(ProjectResponse {
        id,
        message: format!("Project '{}' updated successfully", project.name),
    }))
}

/// Change only the fields present in the body
///
/// PATCH /api/projects/{id}
/// Body: { "actual_hours": "3.5" } or { "notes": null } to clear notes
async fn patch_project(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Json(changes): Json<ProjectChanges>,
) -> Result<Json<Project>, ApiError> {
    changes.validate()?;
    let project = state.service.modify_project(id, changes).await?;
    Ok(Json(project))
}

/// Delete a project and everything it owns
///
/// DELETE /api/projects/{id}
async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<Json<Value>, ApiError> {
    state.service.delete_project(id).await?;
    Ok(Json(json!({
        "message": format!("Project with ID {} deleted successfully", id)
    })))
}
