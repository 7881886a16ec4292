//! fatstonks server binary

use fatstonks::core::error::ErrorContext;
use fatstonks::{api, core, db};

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (handles CLI args, env vars, and config file)
    let config = match core::Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Print error to stderr since logging isn't initialized yet
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let _logger = match core::Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return Err(e);
        }
    };

    info!("Starting fatstonks v{}", fatstonks::VERSION);
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Server configuration"
    );
    info!(path = ?config.database.path, "Database configuration");

    info!("Initializing database...");
    let db = Arc::new(db::DatabaseManager::new(
        &config.database.path,
        config.database.connection_pool_size,
        Duration::from_millis(config.database.busy_timeout),
    )?);
    info!("Database initialized successfully");

    let state = api::AppState::new(db, &config)?;

    if let Some((email, password)) = config.security.bootstrap_admin() {
        state
            .user_service
            .ensure_admin(email, password)
            .await
            .context("Failed to seed bootstrap admin")?;
    }

    let server = api::ApiServer::new(&config, state);
    info!(
        url = %format!("http://{}:{}", config.server.host, config.server.port),
        "Server ready - starting to serve requests"
    );

    server.serve().await?;

    Ok(())
}
