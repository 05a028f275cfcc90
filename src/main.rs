// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Walk Planner API Server
//!
//! Generates dog-walking loops and keeps a history of completed walks.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walk_planner::{
    config::Config,
    db::{FirestoreDb, MemoryDb, WalkDb},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Walk Planner API");

    let db = match &config.gcp_project_id {
        Some(project_id) => {
            let firestore = FirestoreDb::new(project_id).await?;
            tracing::info!(project = %project_id, "Using Firestore walk ledger");
            WalkDb::Firestore(firestore)
        }
        None => {
            tracing::warn!("GCP_PROJECT_ID not set, walks are kept in memory only");
            WalkDb::Memory(MemoryDb::new())
        }
    };

    let state = Arc::new(AppState::new(config.clone(), db));
    if !state.weather_service.is_configured() {
        tracing::warn!("OPENWEATHER_API_KEY not set, weather lookups are disabled");
    }

    // Build router
    let app = walk_planner::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("walk_planner=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
