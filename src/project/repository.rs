/// SQLite persistence for the project aggregate
///
/// Each public operation opens one connection, runs every statement inside a
/// single unit of work and either commits once or rolls back. Sub-collections
/// of a project are only ever read together with the project row, in the
/// same transaction.

use crate::project::types::{Category, Hours, Material, Project, ProjectChanges, ProjectId, Step};
use crate::store::{
    connection::ConnectionProvider,
    error::{Result, StorageError, StorageErrorKind},
    unit_of_work::UnitOfWork,
};
use sqlx::{sqlite::SqliteRow, Row};
use std::sync::Arc;

const INSERT_PROJECT: &str = r#"
    INSERT INTO project (project_name, estimated_hours, actual_hours, difficulty, notes)
    VALUES (?, ?, ?, ?, ?)
"#;

const UPDATE_PROJECT: &str = r#"
    UPDATE project
    SET project_name = ?, estimated_hours = ?, actual_hours = ?, difficulty = ?, notes = ?
    WHERE project_id = ?
"#;

const SELECT_PROJECTS: &str = r#"
    SELECT project_id, project_name, estimated_hours, actual_hours, difficulty, notes
    FROM project
    ORDER BY project_name
"#;

const SELECT_PROJECT: &str = r#"
    SELECT project_id, project_name, estimated_hours, actual_hours, difficulty, notes
    FROM project
    WHERE project_id = ?
"#;

const SELECT_MATERIALS: &str = r#"
    SELECT material_id, project_id, material_name
    FROM material
    WHERE project_id = ?
    ORDER BY material_id
"#;

const SELECT_STEPS: &str = r#"
    SELECT step_id, project_id, step_text, step_order
    FROM step
    WHERE project_id = ?
    ORDER BY step_order, step_id
"#;

const SELECT_CATEGORIES: &str = r#"
    SELECT c.category_id, c.category_name
    FROM category c
    JOIN project_category pc ON c.category_id = pc.category_id
    WHERE pc.project_id = ?
    ORDER BY c.category_name
"#;

/// Reads and writes the project aggregate across its five tables
#[derive(Clone)]
pub struct ProjectRepository {
    provider: Arc<dyn ConnectionProvider>,
}

impl ProjectRepository {
    pub fn new(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self { provider }
    }

    /// Insert the project row and return the project with its new id.
    ///
    /// Materials, steps and categories on the input are not persisted.
    pub async fn insert(&self, mut project: Project) -> Result<Project> {
        let mut conn = self.provider.connect().await?;
        let mut uow = UnitOfWork::begin(&mut conn).await?;

        let outcome = insert_project_row(&mut uow, &project).await;
        let project_id = uow.complete(outcome).await?;

        project.project_id = Some(project_id);
        tracing::info!("📝 Inserted project {} ({})", project_id, project.name);
        Ok(project)
    }

    /// All projects by name, without sub-collections
    pub async fn find_all(&self) -> Result<Vec<Project>> {
        let mut conn = self.provider.connect().await?;
        let mut uow = UnitOfWork::begin(&mut conn).await?;

        let outcome = fetch_all_project_rows(&mut uow).await;
        let projects = uow.complete(outcome).await?;

        tracing::debug!("📋 Listed {} projects", projects.len());
        Ok(projects)
    }

    /// The full aggregate, read as one snapshot
    pub async fn find_by_id(&self, project_id: ProjectId) -> Result<Project> {
        let mut conn = self.provider.connect().await?;
        let mut uow = UnitOfWork::begin(&mut conn).await?;

        let outcome = load_aggregate(&mut uow, project_id).await;
        let project = uow.complete(outcome).await?;

        tracing::debug!(
            "📦 Loaded project {} with {} materials, {} steps, {} categories",
            project_id,
            project.materials.len(),
            project.steps.len(),
            project.categories.len()
        );
        Ok(project)
    }

    /// Overwrite every project column keyed by `project_id`
    pub async fn update(&self, project: &Project) -> Result<()> {
        let project_id = project.project_id.ok_or_else(|| {
            StorageError::new(StorageErrorKind::NotFound, "project has no ID to update")
        })?;

        let mut conn = self.provider.connect().await?;
        let mut uow = UnitOfWork::begin(&mut conn).await?;

        let outcome = update_project_row(&mut uow, project_id, project).await;
        uow.complete(outcome).await?;

        tracing::info!("✏️ Updated project {} ({})", project_id, project.name);
        Ok(())
    }

    /// Apply a partial update and return the resulting project row
    pub async fn modify(&self, project_id: ProjectId, changes: ProjectChanges) -> Result<Project> {
        let mut conn = self.provider.connect().await?;
        let mut uow = UnitOfWork::begin(&mut conn).await?;

        let outcome = modify_project_row(&mut uow, project_id, changes).await;
        let project = uow.complete(outcome).await?;

        tracing::info!("✏️ Modified project {} ({})", project_id, project.name);
        Ok(project)
    }

    /// Delete the project together with its materials, steps and category links
    pub async fn delete(&self, project_id: ProjectId) -> Result<()> {
        let mut conn = self.provider.connect().await?;
        let mut uow = UnitOfWork::begin(&mut conn).await?;

        let outcome = delete_project_rows(&mut uow, project_id).await;
        uow.complete(outcome).await?;

        tracing::info!("🗑️ Deleted project {}", project_id);
        Ok(())
    }
}

async fn insert_project_row(uow: &mut UnitOfWork<'_>, project: &Project) -> Result<ProjectId> {
    let mutation = uow
        .execute(
            sqlx::query(INSERT_PROJECT)
                .bind(&project.name)
                .bind(project.estimated_hours.to_store())
                .bind(project.actual_hours.to_store())
                .bind(project.difficulty)
                .bind(project.notes.as_deref()),
        )
        .await?;

    if mutation.rows_affected == 0 {
        return Err(StorageError::insertion_failed(format!(
            "inserting project '{}' affected no rows",
            project.name
        )));
    }

    mutation.generated_key.ok_or_else(|| {
        StorageError::insertion_failed(format!(
            "no project_id was generated for '{}'",
            project.name
        ))
    })
}

async fn fetch_all_project_rows(uow: &mut UnitOfWork<'_>) -> Result<Vec<Project>> {
    uow.fetch_all(sqlx::query(SELECT_PROJECTS))
        .await?
        .iter()
        .map(extract_project)
        .collect()
}

async fn fetch_project_row(
    uow: &mut UnitOfWork<'_>,
    project_id: ProjectId,
) -> Result<Option<Project>> {
    uow.fetch_optional(sqlx::query(SELECT_PROJECT).bind(project_id))
        .await?
        .as_ref()
        .map(extract_project)
        .transpose()
}

async fn load_aggregate(uow: &mut UnitOfWork<'_>, project_id: ProjectId) -> Result<Project> {
    let mut project = fetch_project_row(uow, project_id)
        .await?
        .ok_or_else(|| StorageError::not_found("Project", project_id))?;

    // The head row exists; any failure from here on is an assembly failure.
    if let Err(e) = attach_children(uow, &mut project, project_id).await {
        return Err(StorageError::aggregate_assembly(project_id, e));
    }
    Ok(project)
}

async fn attach_children(
    uow: &mut UnitOfWork<'_>,
    project: &mut Project,
    project_id: ProjectId,
) -> Result<()> {
    project.materials = fetch_materials(uow, project_id).await?;
    project.steps = fetch_steps(uow, project_id).await?;
    project.categories = fetch_categories(uow, project_id).await?;
    Ok(())
}

async fn fetch_materials(uow: &mut UnitOfWork<'_>, project_id: ProjectId) -> Result<Vec<Material>> {
    uow.fetch_all(sqlx::query(SELECT_MATERIALS).bind(project_id))
        .await?
        .iter()
        .map(extract_material)
        .collect()
}

async fn fetch_steps(uow: &mut UnitOfWork<'_>, project_id: ProjectId) -> Result<Vec<Step>> {
    uow.fetch_all(sqlx::query(SELECT_STEPS).bind(project_id))
        .await?
        .iter()
        .map(extract_step)
        .collect()
}

async fn fetch_categories(
    uow: &mut UnitOfWork<'_>,
    project_id: ProjectId,
) -> Result<Vec<Category>> {
    uow.fetch_all(sqlx::query(SELECT_CATEGORIES).bind(project_id))
        .await?
        .iter()
        .map(extract_category)
        .collect()
}

async fn update_project_row(
    uow: &mut UnitOfWork<'_>,
    project_id: ProjectId,
    project: &Project,
) -> Result<()> {
    let mutation = uow
        .execute(
            sqlx::query(UPDATE_PROJECT)
                .bind(&project.name)
                .bind(project.estimated_hours.to_store())
                .bind(project.actual_hours.to_store())
                .bind(project.difficulty)
                .bind(project.notes.as_deref())
                .bind(project_id),
        )
        .await?;

    if mutation.rows_affected == 0 {
        return Err(StorageError::not_found("Project", project_id));
    }
    Ok(())
}

async fn modify_project_row(
    uow: &mut UnitOfWork<'_>,
    project_id: ProjectId,
    changes: ProjectChanges,
) -> Result<Project> {
    let mut project = fetch_project_row(uow, project_id)
        .await?
        .ok_or_else(|| StorageError::not_found("Project", project_id))?;

    changes.apply(&mut project);
    update_project_row(uow, project_id, &project).await?;
    Ok(project)
}

async fn delete_project_rows(uow: &mut UnitOfWork<'_>, project_id: ProjectId) -> Result<()> {
    for child in [
        "DELETE FROM project_category WHERE project_id = ?",
        "DELETE FROM material WHERE project_id = ?",
        "DELETE FROM step WHERE project_id = ?",
    ] {
        uow.execute(sqlx::query(child).bind(project_id)).await?;
    }

    let mutation = uow
        .execute(sqlx::query("DELETE FROM project WHERE project_id = ?").bind(project_id))
        .await?;

    if mutation.rows_affected == 0 {
        return Err(StorageError::not_found("Project", project_id));
    }
    Ok(())
}

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name).map_err(StorageError::statement)
}

fn hours_column(row: &SqliteRow, name: &str) -> Result<Hours> {
    let value: f64 = column(row, name)?;
    Hours::from_store(value).ok_or_else(|| {
        StorageError::new(
            StorageErrorKind::Statement,
            format!("column {} holds out-of-range hours {}", name, value),
        )
    })
}

fn extract_project(row: &SqliteRow) -> Result<Project> {
    Ok(Project {
        project_id: Some(column(row, "project_id")?),
        name: column(row, "project_name")?,
        estimated_hours: hours_column(row, "estimated_hours")?,
        actual_hours: hours_column(row, "actual_hours")?,
        difficulty: column(row, "difficulty")?,
        notes: column(row, "notes")?,
        materials: Vec::new(),
        steps: Vec::new(),
        categories: Vec::new(),
    })
}

fn extract_material(row: &SqliteRow) -> Result<Material> {
    Ok(Material {
        material_id: column(row, "material_id")?,
        project_id: column(row, "project_id")?,
        name: column(row, "material_name")?,
    })
}

fn extract_step(row: &SqliteRow) -> Result<Step> {
    Ok(Step {
        step_id: column(row, "step_id")?,
        project_id: column(row, "project_id")?,
        text: column(row, "step_text")?,
        order: column(row, "step_order")?,
    })
}

fn extract_category(row: &SqliteRow) -> Result<Category> {
    Ok(Category {
        category_id: column(row, "category_id")?,
        name: column(row, "category_name")?,
    })
}
