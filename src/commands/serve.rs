//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::domain::CommonPasswords;
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, Database};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    // Initialize database
    let db = Database::connect(&config).await;
    tracing::info!("Database connected");

    // Initialize Redis cache
    let cache = Arc::new(Cache::connect(&config).await);

    // Load the common-password dataset once; it is read-only afterwards.
    // A missing dataset disables the dictionary check (logged inside load).
    let common_passwords = Arc::new(CommonPasswords::load(&config.common_passwords_path));

    // Create application state with centralized service container
    let app_state = AppState::from_config(db.get_connection(), cache, config, common_passwords);

    // Build router
    let app = create_router(app_state);

    // Start server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
