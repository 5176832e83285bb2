//! Application setup and initialization
//!
//! All startup logic lives here rather than in main.rs: catalog discovery,
//! generator registration, route construction.

pub mod routes;
pub mod server;
pub mod services;

use std::sync::Arc;

use anyhow::{Context, Result};
use reportd_core::Config;

use crate::state::AppState;

/// Initialize the entire application.
pub fn initialize_app(config: &Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_tracing();

    config.validate().context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    let state = services::initialize_services(config)?;
    let router = routes::setup_routes(config, state.clone())?;

    Ok((state, router))
}
