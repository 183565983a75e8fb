// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava push events, both as delivered and as queued in `webhook_events`.

use serde::{Deserialize, Serialize};

/// Strava webhook event payload.
///
/// Only `object_type` and `object_id` are guaranteed; the rest is optional so
/// that hand-crafted or truncated deliveries still parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StravaEvent {
    pub object_type: String, // "activity" or "athlete"
    pub object_id: u64,
    #[serde(default)]
    pub aspect_type: Option<String>, // "create", "update", "delete"
    #[serde(default)]
    pub owner_id: Option<u64>,
    #[serde(default)]
    pub subscription_id: Option<u64>,
}

impl StravaEvent {
    /// Whether the event announces an activity we should score.
    pub fn is_new_activity(&self) -> bool {
        self.object_type == "activity"
            && self
                .aspect_type
                .as_deref()
                .map_or(true, |aspect| aspect == "create")
    }
}

/// Row of the `webhook_events` queue table.
#[derive(Debug, Clone, Deserialize)]
pub struct QueuedEvent {
    pub id: i64,
    /// Raw event as received
    pub event_data: serde_json::Value,
    #[serde(default)]
    pub processed: bool,
}
