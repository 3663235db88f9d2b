/// Project service facade
///
/// Forwards every call to the repository. It never opens a transaction of its
/// own: the repository owns the only transaction boundary.

use crate::project::{
    repository::ProjectRepository,
    types::{Project, ProjectChanges, ProjectId},
};
use crate::store::{
    connection::ConnectionProvider,
    error::{Result, StorageError},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct ProjectService {
    repository: ProjectRepository,
}

impl ProjectService {
    pub fn new(repository: ProjectRepository) -> Self {
        Self { repository }
    }

    /// Service over a fresh repository for `provider`
    pub fn from_provider(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self::new(ProjectRepository::new(provider))
    }

    pub async fn add_project(&self, project: Project) -> Result<Project> {
        self.repository.insert(project).await
    }

    pub async fn fetch_all_projects(&self) -> Result<Vec<Project>> {
        self.repository.find_all().await
    }

    pub async fn fetch_project_by_id(&self, project_id: ProjectId) -> Result<Project> {
        self.repository
            .find_by_id(project_id)
            .await
            .inspect_err(|e| log_missing(e, Some(project_id)))
    }

    pub async fn modify_project_details(&self, project: &Project) -> Result<()> {
        self.repository
            .update(project)
            .await
            .inspect_err(|e| log_missing(e, project.project_id))
    }

    pub async fn modify_project(
        &self,
        project_id: ProjectId,
        changes: ProjectChanges,
    ) -> Result<Project> {
        self.repository
            .modify(project_id, changes)
            .await
            .inspect_err(|e| log_missing(e, Some(project_id)))
    }

    pub async fn delete_project(&self, project_id: ProjectId) -> Result<()> {
        self.repository
            .delete(project_id)
            .await
            .inspect_err(|e| log_missing(e, Some(project_id)))
    }
}

fn log_missing(err: &StorageError, project_id: Option<ProjectId>) {
    if err.is_not_found() {
        tracing::warn!("🔍 {}", missing_message(project_id));
    }
}

fn missing_message(project_id: Option<ProjectId>) -> String {
    match project_id {
        Some(id) => format!("Project {} does not exist", id),
        None => "Project has no ID".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::types::Hours;
    use crate::store::{
        connection::SqliteConnectionProvider, error::StorageErrorKind, schema::init_schema,
    };
    use std::time::Duration;
    use tempfile::TempDir;

    async fn service() -> (TempDir, ProjectService) {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(SqliteConnectionProvider::new(
            dir.path().join("service.db"),
            Duration::from_secs(5),
        ));
        init_schema(provider.as_ref()).await.unwrap();
        (dir, ProjectService::from_provider(provider))
    }

    #[tokio::test]
    async fn errors_pass_through_with_their_kind() {
        let (_dir, service) = service().await;

        let err = service.fetch_project_by_id(1).await.unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::NotFound);

        let err = service.delete_project(1).await.unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::NotFound);

        let mut ghost = Project::new("Ghost", Hours::ZERO, Hours::ZERO, 1, None);
        ghost.project_id = Some(1);
        let err = service.modify_project_details(&ghost).await.unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::NotFound);
    }

    #[test]
    fn missing_message_does_not_invent_an_id() {
        assert_eq!(missing_message(Some(4)), "Project 4 does not exist");
        assert_eq!(missing_message(None), "Project has no ID");
    }

    #[tokio::test]
    async fn connectivity_failure_surfaces_unchanged() {
        let dir = TempDir::new().unwrap();
        let options = sqlx::sqlite::SqliteConnectOptions::new()
            .filename(dir.path().join("absent").join("db.sqlite"))
            .create_if_missing(false);
        let service = ProjectService::from_provider(Arc::new(
            SqliteConnectionProvider::with_options(options),
        ));

        let err = service.fetch_all_projects().await.unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::Connectivity);
    }
}
