//! Sizing service - stateless provisioning planner over HTTP
//!
//! Loads one performance profile at startup and answers planning requests
//! until interrupted.

use anyhow::{Context, Result};
use sizer_lib::{
    health::{components, planner_self_check},
    HealthRegistry, Planner, PlannerMetrics, PlanningLogger,
};
use sizer_service::{api, config::SizerConfig};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SIZER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let config = SizerConfig::load()?;
    let logger = PlanningLogger::new(&config.instance_name);
    logger.log_startup(SIZER_VERSION);

    let health_registry = HealthRegistry::new();

    let profile = match config.load_profile() {
        Ok(profile) => profile,
        Err(e) => {
            error!(error = %format!("{:#}", e), source = %config.profile_source(), "Failed to load profile");
            return Err(e);
        }
    };
    logger.log_profile_loaded(&profile.name, config.profile_source(), profile.event_sizes.len());
    health_registry.set_healthy(components::PROFILE).await;

    let planner = Planner::new(profile)
        .context("Performance profile rejected")?
        .with_logger(logger.clone());
    health_registry
        .update(components::PLANNER, planner_self_check(&planner))
        .await;

    let metrics = PlannerMetrics::new();
    let app_state = Arc::new(api::AppState::new(planner, health_registry.clone(), metrics));

    health_registry.set_ready(true).await;

    tokio::select! {
        result = api::serve(config.api_port, app_state) => {
            result?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            logger.log_shutdown("SIGINT received");
            info!("Shutting down");
        }
    }

    Ok(())
}
