// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase (PostgREST) client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Athlete profiles
//! - Activities (scored training sessions)
//! - Webhook events (queue drained by `process-queue`)

use crate::db::{tables, ACTIVITY_CONFLICT_KEY};
use crate::error::AppError;
use crate::models::{
    Activity, AthleteProfile, NewActivity, NewAthleteProfile, QueuedEvent, ScoredSession,
};
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Supabase REST client.
#[derive(Clone)]
pub struct SupabaseDb {
    http: reqwest::Client,
    /// `{project}/rest/v1`, or `None` in offline mode
    rest_url: Option<String>,
    api_key: String,
}

impl SupabaseDb {
    /// Create a client for a Supabase project.
    pub fn new(http: reqwest::Client, project_url: &str, api_key: &str) -> Self {
        Self {
            http,
            rest_url: Some(format!("{}/rest/v1", project_url.trim_end_matches('/'))),
            api_key: api_key.to_string(),
        }
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            http: reqwest::Client::new(),
            rest_url: None,
            api_key: String::new(),
        }
    }

    /// Start an authenticated request against a table.
    fn request(&self, method: Method, table: &str) -> Result<RequestBuilder, AppError> {
        let base = self
            .rest_url
            .as_deref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))?;

        Ok(self
            .http
            .request(method, format!("{}/{}", base, table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key))
    }

    // ─── Athlete Operations ──────────────────────────────────────

    /// Get an athlete profile by ID.
    pub async fn get_athlete(&self, athlete_id: Uuid) -> Result<Option<AthleteProfile>, AppError> {
        let request = self
            .request(Method::GET, tables::ATHLETE_PROFILES)?
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", athlete_id))]);

        Ok(fetch_rows(request).await?.into_iter().next())
    }

    /// Find the athlete linked to a Strava account.
    pub async fn get_athlete_by_strava_id(
        &self,
        strava_athlete_id: u64,
    ) -> Result<Option<AthleteProfile>, AppError> {
        let request = self
            .request(Method::GET, tables::ATHLETE_PROFILES)?
            .query(&[
                ("select", "*".to_string()),
                ("strava_athlete_id", format!("eq.{}", strava_athlete_id)),
            ]);

        Ok(fetch_rows(request).await?.into_iter().next())
    }

    /// Create an athlete profile and return the stored row.
    pub async fn insert_athlete(
        &self,
        athlete: &NewAthleteProfile,
    ) -> Result<AthleteProfile, AppError> {
        let request = self
            .request(Method::POST, tables::ATHLETE_PROFILES)?
            .header("Prefer", "return=representation")
            .json(athlete);

        fetch_rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Database("Insert returned no rows".to_string()))
    }

    // ─── Activity Operations ─────────────────────────────────────

    /// Append activities unconditionally (manual entries, seeding).
    pub async fn insert_activities(&self, activities: &[NewActivity]) -> Result<(), AppError> {
        if activities.is_empty() {
            return Ok(());
        }
        let request = self
            .request(Method::POST, tables::ACTIVITIES)?
            .header("Prefer", "return=minimal")
            .json(activities);

        execute(request).await
    }

    /// Insert or merge activities keyed by Strava activity ID.
    ///
    /// Redelivery of the same Strava activity updates the existing row
    /// instead of adding a second one.
    pub async fn upsert_activities(&self, activities: &[NewActivity]) -> Result<(), AppError> {
        if activities.is_empty() {
            return Ok(());
        }
        if activities.iter().any(|a| a.strava_activity_id.is_none()) {
            return Err(AppError::BadRequest(
                "Upsert requires a Strava activity ID on every row".to_string(),
            ));
        }

        let request = self
            .request(Method::POST, tables::ACTIVITIES)?
            .query(&[("on_conflict", ACTIVITY_CONFLICT_KEY)])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(activities);

        execute(request).await
    }

    /// Scores recorded at or after `since`.
    pub async fn get_sessions_since(
        &self,
        athlete_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<ScoredSession>, AppError> {
        let request = self.request(Method::GET, tables::ACTIVITIES)?.query(&[
            ("select", "trimp_score,recorded_at".to_string()),
            ("athlete_id", format!("eq.{}", athlete_id)),
            ("recorded_at", format!("gte.{}", format_utc_rfc3339(since))),
        ]);

        fetch_rows(request).await
    }

    /// Most recent activities for an athlete, newest first.
    pub async fn get_recent_activities(
        &self,
        athlete_id: Uuid,
        limit: u32,
    ) -> Result<Vec<Activity>, AppError> {
        let request = self.request(Method::GET, tables::ACTIVITIES)?.query(&[
            ("select", "*".to_string()),
            ("athlete_id", format!("eq.{}", athlete_id)),
            ("order", "recorded_at.desc".to_string()),
            ("limit", limit.to_string()),
        ]);

        fetch_rows(request).await
    }

    // ─── Webhook Event Queue ─────────────────────────────────────

    /// Unprocessed queued events, oldest first.
    pub async fn get_pending_events(&self) -> Result<Vec<QueuedEvent>, AppError> {
        let request = self.request(Method::GET, tables::WEBHOOK_EVENTS)?.query(&[
            ("select", "*"),
            ("processed", "eq.false"),
            ("order", "id.asc"),
        ]);

        fetch_rows(request).await
    }

    /// Flag a queued event as handled.
    pub async fn mark_event_processed(&self, event_id: i64) -> Result<(), AppError> {
        let request = self
            .request(Method::PATCH, tables::WEBHOOK_EVENTS)?
            .query(&[("id", format!("eq.{}", event_id))])
            .header("Prefer", "return=minimal")
            .json(&serde_json::json!({ "processed": true }));

        execute(request).await
    }
}

/// Send a request and decode a JSON array of rows.
async fn fetch_rows<T: DeserializeOwned>(request: RequestBuilder) -> Result<Vec<T>, AppError> {
    let response = send(request).await?;
    response
        .json()
        .await
        .map_err(|e| AppError::Database(format!("JSON parse error: {}", e)))
}

/// Send a request whose body we do not need.
async fn execute(request: RequestBuilder) -> Result<(), AppError> {
    send(request).await.map(|_| ())
}

/// Send a request and map transport failures and non-2xx statuses.
async fn send(request: RequestBuilder) -> Result<reqwest::Response, AppError> {
    let response = request
        .send()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(AppError::Database(format!("HTTP {}: {}", status, body)))
}
