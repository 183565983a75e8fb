// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training activity model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Where an activity record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySource {
    Webhook,
    Queue,
    Sync,
    Manual,
    Seed,
}

impl fmt::Display for ActivitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivitySource::Webhook => "webhook",
            ActivitySource::Queue => "queue",
            ActivitySource::Sync => "sync",
            ActivitySource::Manual => "manual",
            ActivitySource::Seed => "seed",
        };
        f.write_str(s)
    }
}

/// Activity record as stored in the `activities` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Database row ID
    pub id: i64,
    /// Owning athlete
    pub athlete_id: Uuid,
    /// Strava activity ID (absent for manual entries)
    pub strava_activity_id: Option<u64>,
    /// Activity name/title
    pub name: Option<String>,
    /// Moving time in minutes
    pub duration_min: f64,
    /// Average heart rate (bpm)
    pub average_hr: f64,
    /// Computed TRIMP score
    pub trimp_score: f64,
    /// When the session happened
    pub recorded_at: DateTime<Utc>,
    pub source: ActivitySource,
    /// Average HR was missing and replaced by the placeholder
    #[serde(default)]
    pub heart_rate_estimated: bool,
}

/// Insert/upsert payload for an activity.
#[derive(Debug, Clone, Serialize)]
pub struct NewActivity {
    pub athlete_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strava_activity_id: Option<u64>,
    pub name: Option<String>,
    pub duration_min: f64,
    pub average_hr: f64,
    pub trimp_score: f64,
    pub recorded_at: DateTime<Utc>,
    pub source: ActivitySource,
    pub heart_rate_estimated: bool,
}

/// Minimal projection used by the rolling-load queries.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredSession {
    pub trimp_score: f64,
    pub recorded_at: DateTime<Utc>,
}
