// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth Service API Server
//!
//! Registration, login and profile management on top of a hosted auth
//! provider, relational store and object storage.

use auth_service::{config::Config, AppState, Platform};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first so the log format can follow it
    let config = Config::from_env();
    init_logging(config.as_ref().is_ok_and(Config::is_production));

    let config = config.map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;
    if config.supabase_service_key == config.supabase_api_key {
        tracing::warn!("SUPABASE_SERVICE_ROLE_KEY not set, falling back to SUPABASE_API_KEY");
    }
    tracing::info!(
        port = config.port,
        environment = %config.environment,
        "Starting auth service"
    );

    // One platform client, shared read-only by every request
    let platform = Platform::supabase(&config);
    tracing::info!(url = %config.supabase_url, "Platform client initialized");

    // Build shared state
    let state = Arc::new(AppState::new(&config, platform));

    // Build router
    let app = auth_service::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured logging: JSON in production, human-readable
/// elsewhere.
fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("auth_service=debug,info"));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true),
            )
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
