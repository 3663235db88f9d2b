/// Workbench server entry point
///
/// Loads configuration from the environment and starts the HTTP server:
/// - Project management API at /api/projects/*
/// - Health check at /healthz

use workbench::{config::Config, server::start_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to 0.0.0.0:3004 and data/projects.db
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
