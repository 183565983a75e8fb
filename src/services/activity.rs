// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity processing service.
//!
//! Handles the core workflow:
//! 1. Fetch activity from Strava
//! 2. Resolve the owning athlete and their heart-rate profile
//! 3. Compute the TRIMP score
//! 4. Upsert the record keyed by Strava activity ID
//! 5. Send the WhatsApp notification (webhook deliveries only)

use crate::db::SupabaseDb;
use crate::error::{AppError, Result};
use crate::models::{ActivitySource, AthleteProfile, NewActivity};
use crate::services::notifier::format_activity_message;
use crate::services::strava::StravaActivity;
use crate::services::trimp::calculate_trimp;
use crate::services::{StravaService, WhatsAppNotifier};
use crate::AppState;
use chrono::Utc;
use uuid::Uuid;

/// Average HR assumed when Strava reports none (no monitor worn).
pub const PLACEHOLDER_HEART_RATE: f64 = 130.0;

const UNTITLED_ACTIVITY: &str = "Workout";

/// Fetches, scores and stores Strava activities.
pub struct ActivityProcessor {
    strava: StravaService,
    db: SupabaseDb,
    notifier: WhatsAppNotifier,
    default_athlete_id: Option<Uuid>,
}

impl ActivityProcessor {
    pub fn new(
        strava: StravaService,
        db: SupabaseDb,
        notifier: WhatsAppNotifier,
        default_athlete_id: Option<Uuid>,
    ) -> Self {
        Self {
            strava,
            db,
            notifier,
            default_athlete_id,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.strava_service.clone(),
            state.db.clone(),
            state.notifier.clone(),
            state.config.default_athlete_id,
        )
    }

    /// Process an activity by ID.
    ///
    /// `owner_id` is the Strava athlete ID from the event, when present.
    pub async fn process_activity(
        &self,
        owner_id: Option<u64>,
        activity_id: u64,
        source: ActivitySource,
    ) -> Result<ProcessResult> {
        tracing::info!(?owner_id, activity_id, %source, "Processing activity");

        // 1. Fetch activity from Strava (token management is handled by StravaService)
        let strava_activity = self.strava.get_activity(activity_id).await?;

        // 2. Resolve athlete
        let athlete = self.resolve_athlete(owner_id).await?;

        // 3. Score
        let record = score_activity(&athlete, &strava_activity, source)?;
        if record.heart_rate_estimated {
            tracing::warn!(
                activity_id,
                placeholder = PLACEHOLDER_HEART_RATE,
                "Activity has no heart rate, using placeholder"
            );
        }

        // 4. Store
        self.db
            .upsert_activities(std::slice::from_ref(&record))
            .await?;

        tracing::info!(
            athlete_id = %athlete.id,
            activity_id,
            trimp = record.trimp_score,
            "Activity scored and stored"
        );

        // 5. Notify; a failed message does not fail the activity
        let notified = if source == ActivitySource::Webhook {
            self.notify(&athlete, &record).await
        } else {
            false
        };

        Ok(ProcessResult {
            activity_id,
            athlete_id: athlete.id,
            trimp_score: record.trimp_score,
            heart_rate_estimated: record.heart_rate_estimated,
            notified,
        })
    }

    /// Strava owner first, then the configured default athlete.
    async fn resolve_athlete(&self, owner_id: Option<u64>) -> Result<AthleteProfile> {
        if let Some(owner_id) = owner_id {
            if let Some(athlete) = self.db.get_athlete_by_strava_id(owner_id).await? {
                return Ok(athlete);
            }
            tracing::debug!(owner_id, "No athlete linked to Strava owner");
        }

        let default_id = self.default_athlete_id.ok_or_else(|| {
            AppError::NotFound(format!("No athlete for Strava owner {:?}", owner_id))
        })?;

        self.db
            .get_athlete(default_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Athlete {}", default_id)))
    }

    async fn notify(&self, athlete: &AthleteProfile, record: &NewActivity) -> bool {
        if !athlete.subscription_active {
            tracing::debug!(athlete_id = %athlete.id, "Subscription inactive, skipping notification");
            return false;
        }
        let Some(to) = self.notifier.destination(athlete.phone_number.as_deref()) else {
            tracing::debug!(athlete_id = %athlete.id, "No WhatsApp destination, skipping");
            return false;
        };

        let body = format_activity_message(
            record.name.as_deref().unwrap_or(UNTITLED_ACTIVITY),
            record.trimp_score,
            record.duration_min,
        );

        match self.notifier.send(&to, &body).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, athlete_id = %athlete.id, "Failed to send WhatsApp notification");
                false
            }
        }
    }
}

/// Result of processing an activity.
#[derive(Debug)]
pub struct ProcessResult {
    pub activity_id: u64,
    pub athlete_id: Uuid,
    pub trimp_score: f64,
    pub heart_rate_estimated: bool,
    pub notified: bool,
}

/// Build the stored record for a fetched activity.
///
/// Missing heart rate is replaced by [`PLACEHOLDER_HEART_RATE`] and the
/// record is flagged as estimated.
pub fn score_activity(
    athlete: &AthleteProfile,
    activity: &StravaActivity,
    source: ActivitySource,
) -> Result<NewActivity> {
    let (average_hr, heart_rate_estimated) = match activity.heart_rate() {
        Some(hr) => (hr, false),
        None => (PLACEHOLDER_HEART_RATE, true),
    };
    let duration_min = activity.duration_minutes();
    let trimp_score = calculate_trimp(duration_min, average_hr, &athlete.heart_rate_profile())?;

    Ok(NewActivity {
        athlete_id: athlete.id,
        strava_activity_id: Some(activity.id),
        name: activity.name.clone(),
        duration_min,
        average_hr,
        trimp_score,
        recorded_at: activity.start_date.unwrap_or_else(Utc::now),
        source,
        heart_rate_estimated,
    })
}
