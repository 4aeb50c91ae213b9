// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Farehawk API Server
//!
//! Backend for the Farehawk flight-deal discovery web app. Delegates
//! identity and storage to the hosted platform and serves session
//! bootstrap, onboarding, and deal listing to the SPA.

use farehawk::{
    config::Config,
    db::RestStore,
    services::{IdentityClient, SessionService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Farehawk API");

    // Clients for the hosted platform (data API + identity provider)
    let db = RestStore::new(&config.platform_url, &config.platform_anon_key);
    let identity = IdentityClient::new(&config.platform_url, &config.platform_anon_key);
    tracing::info!(platform = %config.platform_url, "Platform clients initialized");

    // Session/profile orchestrator
    let sessions = SessionService::new(db.clone(), identity.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        identity,
        sessions,
    });

    // Build router
    let app = farehawk::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("farehawk=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
