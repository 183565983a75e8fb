// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated athletes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Activity, ActivitySource, AthleteProfile, LoadReport, NewActivity};
use crate::services::trimp::calculate_trimp;
use crate::services::{load, notifier, sync};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/activities", get(get_activities).post(create_activity))
        .route("/api/load", get(get_load))
        .route("/api/load/notify", post(notify_load))
        .route("/api/coaching", get(get_coaching))
        .route("/api/sync", post(sync_activities))
}

async fn load_athlete(state: &AppState, user: AuthUser) -> Result<AthleteProfile> {
    state
        .db
        .get_athlete(user.athlete_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Athlete {} not found", user.athlete_id)))
}

/// Training data is only served while the subscription is active.
async fn load_active_athlete(state: &AppState, user: AuthUser) -> Result<AthleteProfile> {
    let athlete = load_athlete(state, user).await?;
    if !athlete.subscription_active {
        tracing::info!(athlete_id = %athlete.id, "Rejecting request: subscription inactive");
        return Err(AppError::SubscriptionInactive);
    }
    Ok(athlete)
}

// ─── Athlete Profile ─────────────────────────────────────────

/// Get current athlete profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<AthleteProfile>> {
    Ok(Json(load_athlete(&state, user).await?))
}

// ─── Activities ──────────────────────────────────────────────

#[derive(Deserialize)]
struct ActivitiesQuery {
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    50
}

const MAX_LIMIT: u32 = 200;

#[derive(Serialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<Activity>,
    pub limit: u32,
}

/// Most recent activities, newest first.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<ActivitiesResponse>> {
    let limit = params.limit.clamp(1, MAX_LIMIT);
    let athlete = load_active_athlete(&state, user).await?;
    let activities = state.db.get_recent_activities(athlete.id, limit).await?;

    Ok(Json(ActivitiesResponse { activities, limit }))
}

/// Manually recorded session.
#[derive(Debug, Deserialize, Validate)]
pub struct ManualActivityRequest {
    /// Duration in minutes (up to one day)
    #[validate(range(min = 1.0, max = 1440.0))]
    pub duration_min: f64,
    /// Average heart rate (bpm)
    #[validate(range(min = 30.0, max = 250.0))]
    pub average_hr: f64,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// Defaults to now
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct ManualActivityResponse {
    pub trimp_score: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Score and store a manual entry with the athlete's profile.
async fn create_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<ManualActivityRequest>,
) -> Result<Json<ManualActivityResponse>> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let athlete = load_active_athlete(&state, user).await?;
    let trimp_score = calculate_trimp(
        request.duration_min,
        request.average_hr,
        &athlete.heart_rate_profile(),
    )?;
    let recorded_at = request.recorded_at.unwrap_or_else(Utc::now);

    let record = NewActivity {
        athlete_id: athlete.id,
        strava_activity_id: None,
        name: request.name,
        duration_min: request.duration_min,
        average_hr: request.average_hr,
        trimp_score,
        recorded_at,
        source: ActivitySource::Manual,
        heart_rate_estimated: false,
    };
    state.db.insert_activities(&[record]).await?;

    tracing::info!(athlete_id = %athlete.id, trimp = trimp_score, "Manual activity recorded");

    Ok(Json(ManualActivityResponse {
        trimp_score,
        recorded_at,
    }))
}

// ─── Training Load ───────────────────────────────────────────

/// Current ACWR report.
async fn get_load(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LoadReport>> {
    let athlete = load_active_athlete(&state, user).await?;
    let report = load::assess_athlete(&state.db, athlete.id, Utc::now()).await?;
    Ok(Json(report))
}

#[derive(Serialize)]
pub struct CoachingResponse {
    pub report: LoadReport,
    pub message: String,
}

async fn coaching_for(
    state: &AppState,
    user: AuthUser,
) -> Result<(AthleteProfile, CoachingResponse)> {
    let athlete = load_active_athlete(state, user).await?;
    let report = load::assess_athlete(&state.db, athlete.id, Utc::now()).await?;
    let message = state.coach.coaching_message(&athlete.name, &report).await;
    Ok((athlete, CoachingResponse { report, message }))
}

/// Report plus coaching text.
async fn get_coaching(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CoachingResponse>> {
    let (_, coaching) = coaching_for(&state, user).await?;
    Ok(Json(coaching))
}

#[derive(Serialize)]
pub struct NotifyResponse {
    pub sid: String,
    #[serde(flatten)]
    pub coaching: CoachingResponse,
}

/// Send the report and coaching text over WhatsApp.
async fn notify_load(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<NotifyResponse>> {
    let (athlete, coaching) = coaching_for(&state, user).await?;

    let to = state
        .notifier
        .destination(athlete.phone_number.as_deref())
        .ok_or_else(|| AppError::BadRequest("No WhatsApp number on file".to_string()))?;
    let body = notifier::format_load_message(&coaching.report, &coaching.message);
    let sid = state.notifier.send(&to, &body).await?;

    Ok(Json(NotifyResponse { sid, coaching }))
}

// ─── Strava Sync ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct SyncResponse {
    pub synced: usize,
}

/// Upsert the 30 most recent Strava activities owned by the athlete.
async fn sync_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SyncResponse>> {
    let athlete = load_active_athlete(&state, user).await?;
    let synced = sync::sync_recent_activities(&state.strava_service, &state.db, &athlete).await?;
    Ok(Json(SyncResponse { synced }))
}
