//! Application setup and initialization
//!
//! Everything `main` needs to go from a `Config` to a served router lives here so the
//! integration tests can assemble the same router around an in-memory state.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use prflow_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_json())
        .context("Failed to initialize telemetry")?;

    tracing::info!(
        environment = config.environment(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;

    let state = services::initialize_services(pool);

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
