// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::streaming_service::StreamingDashboardService;
use crate::domain::resampler::TimeSeriesResampler;
use crate::infrastructure::config::load_config;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,weather_dashboard=debug".into()),
        )
        .init();

    // Load configuration
    let config = load_config()?;
    let offset = config.dashboard.utc_offset()?;
    tracing::info!(
        title = %config.dashboard.title,
        %offset,
        default_metric = %config.dashboard.default_metric,
        "Configuration loaded"
    );

    // Create services (application layer)
    let resampler = TimeSeriesResampler::new(offset);
    let dashboard_service = DashboardService::new(resampler, config.dashboard.title.clone());
    let streaming_service = StreamingDashboardService::new(dashboard_service.clone());

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        streaming_service,
        default_metric: config.dashboard.default_metric,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind_address()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.bind_address()))?;
    tracing::info!(%addr, "Starting weather-dashboard service");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, router).await?;

    Ok(())
}
