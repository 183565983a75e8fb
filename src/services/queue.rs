// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Drain of the `webhook_events` queue table.
//!
//! Every pending event is marked processed after one attempt, whether or not
//! scoring succeeded, so a permanently broken event cannot wedge the queue.

use crate::db::SupabaseDb;
use crate::error::Result;
use crate::models::{ActivitySource, QueuedEvent, StravaEvent};
use crate::services::ActivityProcessor;

/// Counts from one drain run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainSummary {
    pub pending: usize,
    pub scored: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Process every unprocessed queued event once.
pub async fn drain_pending_events(
    db: &SupabaseDb,
    processor: &ActivityProcessor,
) -> Result<DrainSummary> {
    let events = db.get_pending_events().await?;
    let mut summary = DrainSummary {
        pending: events.len(),
        ..Default::default()
    };

    if events.is_empty() {
        tracing::info!("No pending webhook events");
        return Ok(summary);
    }

    tracing::info!(count = events.len(), "Draining webhook event queue");

    for queued in &events {
        match handle_event(processor, queued).await {
            EventOutcome::Scored => summary.scored += 1,
            EventOutcome::Skipped => summary.skipped += 1,
            EventOutcome::Failed => summary.failed += 1,
        }

        db.mark_event_processed(queued.id).await?;
    }

    tracing::info!(
        scored = summary.scored,
        skipped = summary.skipped,
        failed = summary.failed,
        "Queue drained"
    );
    Ok(summary)
}

enum EventOutcome {
    Scored,
    Skipped,
    Failed,
}

async fn handle_event(processor: &ActivityProcessor, queued: &QueuedEvent) -> EventOutcome {
    let event: StravaEvent = match serde_json::from_value(queued.event_data.clone()) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(event_id = queued.id, error = %e, "Unparseable queued event");
            return EventOutcome::Skipped;
        }
    };

    if !event.is_new_activity() {
        tracing::debug!(
            event_id = queued.id,
            object_type = %event.object_type,
            "Ignoring queued event"
        );
        return EventOutcome::Skipped;
    }

    match processor
        .process_activity(event.owner_id, event.object_id, ActivitySource::Queue)
        .await
    {
        Ok(_) => EventOutcome::Scored,
        Err(e) => {
            tracing::error!(
                event_id = queued.id,
                activity_id = event.object_id,
                error = %e,
                "Failed to process queued activity"
            );
            EventOutcome::Failed
        }
    }
}
