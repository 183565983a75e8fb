// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TRIMP Tracker API Server
//!
//! Receives Strava webhooks, scores each activity and serves the training
//! load dashboard API.

use std::sync::Arc;
use trimp_tracker::{config::Config, logging::init_logging, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting TRIMP Tracker API");

    if config.default_athlete_id.is_none() {
        tracing::warn!("DEFAULT_ATHLETE_ID not set; webhooks need a linked Strava owner");
    }

    let port = config.port;
    let state = Arc::new(AppState::new(config));

    let app = trimp_tracker::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
