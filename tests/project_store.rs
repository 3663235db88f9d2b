//! Integration tests for the project store
//!
//! These run the service against a temporary SQLite file. Each operation opens
//! its own connection, so an in-memory database would not survive between calls.

use sqlx::{Connection, SqliteConnection};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use workbench::project::{Hours, Material, Project, ProjectService};
use workbench::store::{schema::init_schema, SqliteConnectionProvider, StorageErrorKind};

struct TestStore {
    _dir: TempDir,
    path: PathBuf,
    service: ProjectService,
}

impl TestStore {
    async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("projects.db");
        let provider = Arc::new(SqliteConnectionProvider::new(&path, Duration::from_secs(5)));
        init_schema(provider.as_ref()).await.unwrap();

        Self {
            _dir: dir,
            path,
            service: ProjectService::from_provider(provider),
        }
    }

    /// Raw connection for writing rows the service has no operation for
    async fn raw(&self) -> SqliteConnection {
        SqliteConnection::connect(&format!("sqlite:{}", self.path.display()))
            .await
            .unwrap()
    }
}

fn hours(s: &str) -> Hours {
    s.parse().unwrap()
}

fn project(name: &str) -> Project {
    Project::new(name, hours("4"), hours("1.5"), 2, None)
}

fn birdhouse() -> Project {
    Project::new("Birdhouse", hours("2.5"), hours("0"), 3, Some("fun".to_string()))
}

async fn listed_names(service: &ProjectService) -> Vec<String> {
    service
        .fetch_all_projects()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect()
}

#[tokio::test]
async fn insert_assigns_id_and_keeps_fields() {
    let store = TestStore::new().await;
    let input = Project::new("Shelf", hours("6.25"), hours("7"), 4, Some("pine".into()));

    let saved = store.service.add_project(input.clone()).await.unwrap();

    assert!(saved.project_id.unwrap() > 0);
    assert_eq!(saved.name, input.name);
    assert_eq!(saved.estimated_hours, input.estimated_hours);
    assert_eq!(saved.actual_hours, input.actual_hours);
    assert_eq!(saved.difficulty, input.difficulty);
    assert_eq!(saved.notes, input.notes);
}

#[tokio::test]
async fn insert_then_find_returns_equal_aggregate_with_empty_collections() {
    let store = TestStore::new().await;

    let saved = store.service.add_project(birdhouse()).await.unwrap();
    let found = store
        .service
        .fetch_project_by_id(saved.project_id.unwrap())
        .await
        .unwrap();

    assert_eq!(found, saved);
    assert!(found.materials.is_empty());
    assert!(found.steps.is_empty());
    assert!(found.categories.is_empty());
}

#[tokio::test]
async fn find_by_missing_id_is_not_found() {
    let store = TestStore::new().await;

    let err = store.service.fetch_project_by_id(12345).await.unwrap_err();

    assert_eq!(err.kind(), StorageErrorKind::NotFound);
}

#[tokio::test]
async fn update_of_missing_id_is_not_found_and_changes_nothing() {
    let store = TestStore::new().await;
    let saved = store.service.add_project(birdhouse()).await.unwrap();
    let before = store.service.fetch_all_projects().await.unwrap();

    let mut ghost = project("Ghost");
    ghost.project_id = Some(saved.project_id.unwrap() + 100);
    let err = store.service.modify_project_details(&ghost).await.unwrap_err();

    assert_eq!(err.kind(), StorageErrorKind::NotFound);
    assert_eq!(store.service.fetch_all_projects().await.unwrap(), before);
}

#[tokio::test]
async fn update_overwrites_every_column() {
    let store = TestStore::new().await;
    let mut saved = store.service.add_project(birdhouse()).await.unwrap();

    saved.name = "Bird feeder".to_string();
    saved.estimated_hours = hours("3.75");
    saved.actual_hours = hours("1");
    saved.difficulty = 2;
    saved.notes = None;
    store.service.modify_project_details(&saved).await.unwrap();

    let found = store
        .service
        .fetch_project_by_id(saved.project_id.unwrap())
        .await
        .unwrap();
    assert_eq!(found, saved);
}

#[tokio::test]
async fn delete_then_find_is_not_found_and_list_omits_it() {
    let store = TestStore::new().await;
    let keep = store.service.add_project(project("Keep")).await.unwrap();
    let gone = store.service.add_project(project("Gone")).await.unwrap();
    let gone_id = gone.project_id.unwrap();

    store.service.delete_project(gone_id).await.unwrap();

    let err = store.service.fetch_project_by_id(gone_id).await.unwrap_err();
    assert_eq!(err.kind(), StorageErrorKind::NotFound);

    let ids: Vec<_> = store
        .service
        .fetch_all_projects()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.project_id)
        .collect();
    assert_eq!(ids, vec![keep.project_id]);

    let err = store.service.delete_project(gone_id).await.unwrap_err();
    assert_eq!(err.kind(), StorageErrorKind::NotFound);
}

#[tokio::test]
async fn find_all_sorts_by_name_regardless_of_insertion_order() {
    let store = TestStore::new().await;
    for name in ["Workbench", "Bookcase", "Raised bed", "Coat rack"] {
        store.service.add_project(project(name)).await.unwrap();
    }

    assert_eq!(
        listed_names(&store.service).await,
        vec!["Bookcase", "Coat rack", "Raised bed", "Workbench"]
    );
}

#[tokio::test]
async fn find_all_on_empty_store_is_empty() {
    let store = TestStore::new().await;

    assert!(store.service.fetch_all_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn find_all_is_a_projection_without_sub_collections() {
    let store = TestStore::new().await;
    let saved = store.service.add_project(birdhouse()).await.unwrap();
    let id = saved.project_id.unwrap();

    let mut conn = store.raw().await;
    sqlx::query("INSERT INTO material (project_id, material_name) VALUES (?, 'wood')")
        .bind(id)
        .execute(&mut conn)
        .await
        .unwrap();

    let listed = store.service.fetch_all_projects().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].materials.is_empty());
}

#[tokio::test]
async fn birdhouse_with_directly_inserted_material() {
    let store = TestStore::new().await;

    let saved = store.service.add_project(birdhouse()).await.unwrap();
    assert_eq!(saved.project_id, Some(1));

    let mut conn = store.raw().await;
    sqlx::query("INSERT INTO material (project_id, material_name) VALUES (?, ?)")
        .bind(1_i64)
        .bind("wood")
        .execute(&mut conn)
        .await
        .unwrap();
    conn.close().await.unwrap();

    let found = store.service.fetch_project_by_id(1).await.unwrap();

    assert_eq!(found.name, "Birdhouse");
    assert_eq!(found.estimated_hours.to_string(), "2.50");
    assert_eq!(found.actual_hours, Hours::ZERO);
    assert_eq!(found.difficulty, 3);
    assert_eq!(found.notes.as_deref(), Some("fun"));
    assert_eq!(found.materials.len(), 1);
    let Material {
        project_id, name, ..
    } = &found.materials[0];
    assert_eq!(*project_id, 1);
    assert_eq!(name, "wood");
    assert!(found.steps.is_empty());
    assert!(found.categories.is_empty());
}

#[tokio::test]
async fn ant_farm_lists_before_birdhouse() {
    let store = TestStore::new().await;

    store.service.add_project(project("Birdhouse")).await.unwrap();
    store.service.add_project(project("Ant farm")).await.unwrap();

    assert_eq!(
        listed_names(&store.service).await,
        vec!["Ant farm", "Birdhouse"]
    );
}

#[tokio::test]
async fn category_outlives_deleted_projects_that_share_it() {
    let store = TestStore::new().await;
    let first = store.service.add_project(project("Planter")).await.unwrap();
    let second = store.service.add_project(project("Trellis")).await.unwrap();
    let (first_id, second_id) = (first.project_id.unwrap(), second.project_id.unwrap());

    let mut conn = store.raw().await;
    sqlx::query("INSERT INTO category (category_name) VALUES ('Garden')")
        .execute(&mut conn)
        .await
        .unwrap();
    for id in [first_id, second_id] {
        sqlx::query("INSERT INTO project_category (project_id, category_id) VALUES (?, 1)")
            .bind(id)
            .execute(&mut conn)
            .await
            .unwrap();
    }

    store.service.delete_project(first_id).await.unwrap();

    let remaining = store.service.fetch_project_by_id(second_id).await.unwrap();
    assert_eq!(remaining.categories.len(), 1);
    assert_eq!(remaining.categories[0].name, "Garden");
}
