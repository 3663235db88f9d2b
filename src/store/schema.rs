/// Project store schema bootstrap
///
/// Creates the five project tables if they are missing. Safe to call on every
/// start (uses IF NOT EXISTS), and runs as one unit of work.

use crate::store::{
    connection::ConnectionProvider,
    error::{Result, StorageError, StorageErrorKind},
    unit_of_work::UnitOfWork,
};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS project (
        project_id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_name TEXT NOT NULL,
        estimated_hours REAL NOT NULL DEFAULT 0,
        actual_hours REAL NOT NULL DEFAULT 0,
        difficulty INTEGER NOT NULL,
        notes TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS material (
        material_id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id INTEGER NOT NULL REFERENCES project (project_id) ON DELETE CASCADE,
        material_name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS step (
        step_id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id INTEGER NOT NULL REFERENCES project (project_id) ON DELETE CASCADE,
        step_text TEXT NOT NULL,
        step_order INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS category (
        category_id INTEGER PRIMARY KEY AUTOINCREMENT,
        category_name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS project_category (
        project_id INTEGER NOT NULL REFERENCES project (project_id) ON DELETE CASCADE,
        category_id INTEGER NOT NULL REFERENCES category (category_id) ON DELETE CASCADE,
        PRIMARY KEY (project_id, category_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_project_name ON project(project_name)",
    "CREATE INDEX IF NOT EXISTS idx_material_project ON material(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_step_project ON step(project_id, step_order)",
];

/// Create all project tables and indexes
pub async fn init_schema(provider: &dyn ConnectionProvider) -> Result<()> {
    let mut conn = provider.connect().await?;
    let mut uow = UnitOfWork::begin(&mut conn).await?;

    for ddl in SCHEMA {
        if let Err(e) = uow.execute(sqlx::query(*ddl)).await {
            let err = StorageError::with_cause(
                StorageErrorKind::Schema,
                "failed to create project schema",
                e,
            );
            return Err(uow.rollback(err).await);
        }
    }

    uow.commit().await?;
    tracing::info!("🗄️ Project schema ready");
    Ok(())
}
