// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for fetching activities.
//!
//! Handles:
//! - Detailed activity fetching (moving time, average heart rate)
//! - Recent activity listing for sync
//! - Access token refresh from the long-lived refresh token
//! - Rate limit and token error detection

use crate::config::Config;
use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Margin before token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(
        http: reqwest::Client,
        api_url: &str,
        oauth_url: &str,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            oauth_url: oauth_url.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
        }
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<StravaActivity, AppError> {
        let url = format!("{}/activities/{}", self.api_url, activity_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        check_response_json(response).await
    }

    /// List the authenticated athlete's most recent activities.
    pub async fn list_activities(
        &self,
        access_token: &str,
        per_page: u32,
    ) -> Result<Vec<StravaActivity>, AppError> {
        let url = format!("{}/athlete/activities", self.api_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("per_page", per_page.to_string())])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        check_response_json(response).await
    }

    /// Exchange the refresh token for a new access token.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse, AppError> {
        let response = self
            .http
            .post(format!("{}/token", self.oauth_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {}", e)))?;

        check_response_json(response).await
    }
}

/// Check response and parse JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!("Strava rate limit hit (429)");
            return Err(AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string()));
        }

        if status.as_u16() == 401 {
            return Err(AppError::StravaApi(
                AppError::STRAVA_TOKEN_ERROR.to_string(),
            ));
        }

        return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

/// Strava activity (detailed or summary representation).
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivity {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    /// Moving time in seconds
    pub moving_time: u64,
    /// Average heart rate; absent when recorded without a monitor
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Owning athlete (meta representation)
    #[serde(default)]
    pub athlete: Option<StravaAthleteRef>,
}

/// Athlete reference embedded in activity payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaAthleteRef {
    pub id: u64,
}

impl StravaActivity {
    /// Strava ID of the athlete who recorded the activity, if reported.
    pub fn owner_id(&self) -> Option<u64> {
        self.athlete.as_ref().map(|a| a.id)
    }

    pub fn duration_minutes(&self) -> f64 {
        self.moving_time as f64 / 60.0
    }

    /// Average heart rate, treating zero as missing.
    pub fn heart_rate(&self) -> Option<f64> {
        self.average_heartrate.filter(|hr| *hr > 0.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StravaService - High-level service with token management
// ─────────────────────────────────────────────────────────────────────────────

/// Cached access token with expiry information.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// High-level Strava service for the connected account.
///
/// Holds the long-lived refresh token and serializes refreshes so that
/// concurrent webhook deliveries share one access token.
#[derive(Clone)]
pub struct StravaService {
    client: StravaClient,
    refresh_token: String,
    cached: Arc<Mutex<Option<CachedToken>>>,
}

impl StravaService {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            client: StravaClient::new(
                http,
                &config.strava_api_url,
                &config.strava_oauth_url,
                config.strava_client_id.clone(),
                config.strava_client_secret.clone(),
            ),
            refresh_token: config.strava_refresh_token.clone(),
            cached: Arc::new(Mutex::new(None)),
        }
    }

    // ─── Token Management ────────────────────────────────────────────────────

    /// Get an access token that stays valid for at least the refresh margin.
    ///
    /// The lock is held across the refresh call so only one request talks
    /// to the token endpoint at a time.
    pub async fn get_valid_access_token(&self) -> Result<String, AppError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        let margin = Duration::seconds(TOKEN_REFRESH_MARGIN_SECS);

        if let Some(token) = cached.as_ref() {
            if now + margin < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        tracing::info!("Refreshing Strava access token");
        let refreshed = self.client.refresh_token(&self.refresh_token).await?;

        match refreshed.expires_at.and_then(|ts| DateTime::from_timestamp(ts, 0)) {
            Some(expires_at) => {
                *cached = Some(CachedToken {
                    access_token: refreshed.access_token.clone(),
                    expires_at,
                });
            }
            // No expiry reported: use once, refresh next time
            None => *cached = None,
        }

        Ok(refreshed.access_token)
    }

    /// Forget the cached token (e.g. after Strava rejected it).
    pub async fn invalidate_token(&self) {
        *self.cached.lock().await = None;
    }

    // ─── API Wrappers ────────────────────────────────────────────────────────

    /// Get a detailed activity by ID.
    pub async fn get_activity(&self, activity_id: u64) -> Result<StravaActivity, AppError> {
        let access_token = self.get_valid_access_token().await?;
        let result = self.client.get_activity(&access_token, activity_id).await;
        if matches!(&result, Err(e) if e.is_strava_token_error()) {
            self.invalidate_token().await;
        }
        result
    }

    /// List the most recent activities of the connected account.
    pub async fn list_recent_activities(
        &self,
        per_page: u32,
    ) -> Result<Vec<StravaActivity>, AppError> {
        let access_token = self.get_valid_access_token().await?;
        let result = self.client.list_activities(&access_token, per_page).await;
        if matches!(&result, Err(e) if e.is_strava_token_error()) {
            self.invalidate_token().await;
        }
        result
    }
}
