// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pull the most recent Strava activities and upsert their scores.

use crate::db::SupabaseDb;
use crate::error::{AppError, Result};
use crate::models::{ActivitySource, AthleteProfile, NewActivity};
use crate::services::activity::score_activity;
use crate::services::strava::StravaActivity;
use crate::services::StravaService;

/// Activities requested per sync.
pub const SYNC_PAGE_SIZE: u32 = 30;

/// Score the listed activities owned by `strava_athlete_id`.
///
/// Records go through the same scoring as webhook deliveries, so a sync
/// merging over an existing row stores the same values. Activities whose
/// owner is missing or different are left out.
pub fn sync_records(
    athlete: &AthleteProfile,
    strava_athlete_id: u64,
    activities: &[StravaActivity],
) -> Result<Vec<NewActivity>> {
    activities
        .iter()
        .filter(|a| a.owner_id() == Some(strava_athlete_id))
        .map(|a| score_activity(athlete, a, ActivitySource::Sync))
        .collect()
}

/// Sync recent activities for an athlete; returns the number upserted.
pub async fn sync_recent_activities(
    strava: &StravaService,
    db: &SupabaseDb,
    athlete: &AthleteProfile,
) -> Result<usize> {
    let strava_athlete_id = athlete
        .strava_athlete_id
        .ok_or_else(|| AppError::BadRequest("Athlete is not linked to Strava".to_string()))?;

    let activities = strava.list_recent_activities(SYNC_PAGE_SIZE).await?;
    let records = sync_records(athlete, strava_athlete_id, &activities)?;

    let skipped = activities.len() - records.len();
    if skipped > 0 {
        tracing::warn!(
            athlete_id = %athlete.id,
            strava_athlete_id,
            skipped,
            "Skipping listed activities owned by another Strava athlete"
        );
    }

    db.upsert_activities(&records).await?;

    tracing::info!(
        athlete_id = %athlete.id,
        count = records.len(),
        "Recent activities synced"
    );
    Ok(records.len())
}
