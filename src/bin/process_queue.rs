// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Drain the `webhook_events` queue once and exit.
//!
//! Meant to be run from cron next to the hosted function that stores raw
//! Strava events.

use trimp_tracker::{
    config::Config, logging::init_logging, services::queue::drain_pending_events,
    services::ActivityProcessor, AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    let state = AppState::new(config);
    let processor = ActivityProcessor::from_state(&state);

    let summary = drain_pending_events(&state.db, &processor).await?;
    tracing::info!(
        pending = summary.pending,
        scored = summary.scored,
        skipped = summary.skipped,
        failed = summary.failed,
        "Queue run finished"
    );

    Ok(())
}
