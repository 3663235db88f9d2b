/// Server setup and initialization
///
/// Wires together the connection provider, schema bootstrap, project service
/// and HTTP routes.

use crate::{
    api::projects::{create_project_routes, AppState},
    config::Config,
    project::ProjectService,
    store::{connection::SqliteConnectionProvider, schema::init_schema},
};
use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Create the main Axum application with all routes
///
/// Ensures the database directory and schema exist before any request is served.
pub async fn create_app(config: Config) -> Result<Router> {
    let db_path = &config.database.path;
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tracing::info!("📁 Ensuring database directory exists: {}", parent.display());
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create database directory: {}", e))?;
    }

    tracing::info!("🗄️ Using project store: {}", db_path.display());
    let provider = Arc::new(SqliteConnectionProvider::new(
        db_path,
        config.database.busy_timeout(),
    ));

    init_schema(provider.as_ref())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize project schema: {}", e))?;

    let service = ProjectService::from_provider(provider);
    let app = build_router(service);

    tracing::info!("✅ Application initialized successfully");
    Ok(app)
}

/// Router over an already-built service
pub fn build_router(service: ProjectService) -> Router {
    Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        // Project management API routes
        .merge(create_project_routes().with_state(AppState { service }))
}

/// Start the HTTP server with the given configuration
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting Workbench server...");

    let app = create_app(config.clone()).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}
