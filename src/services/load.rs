// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rolling-window training load (ACWR).
//!
//! Acute load is the mean daily TRIMP of the last 7 days, chronic load the
//! mean daily TRIMP of the last 28 days. The 28-day window is fetched once and
//! the acute sum is taken from the same rows.

use crate::db::SupabaseDb;
use crate::error::Result;
use crate::models::{LoadReport, LoadStatus, ScoredSession};
use crate::services::trimp::round2;
use crate::time_utils::window_start;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const ACUTE_WINDOW_DAYS: i64 = 7;
pub const CHRONIC_WINDOW_DAYS: i64 = 28;

/// Compute the report from daily-average loads.
pub fn compute_report(acute_load: f64, chronic_load: f64) -> LoadReport {
    if chronic_load == 0.0 {
        return LoadReport {
            acute_load,
            chronic_load,
            ratio: 1.0,
            status: LoadStatus::InsufficientHistory,
        };
    }

    let ratio = round2(acute_load / chronic_load);
    LoadReport {
        acute_load,
        chronic_load,
        ratio,
        status: LoadStatus::classify(ratio),
    }
}

/// Build the report from sessions as of `now`.
///
/// Sessions older than the chronic window are ignored, so callers may pass
/// a superset.
pub fn report_from_sessions(sessions: &[ScoredSession], now: DateTime<Utc>) -> LoadReport {
    let acute_start = window_start(now, ACUTE_WINDOW_DAYS);
    let chronic_start = window_start(now, CHRONIC_WINDOW_DAYS);

    let (acute_sum, chronic_sum) = sessions
        .iter()
        .filter(|s| s.recorded_at >= chronic_start)
        .fold((0.0, 0.0), |(acute, chronic), s| {
            let acute = if s.recorded_at >= acute_start {
                acute + s.trimp_score
            } else {
                acute
            };
            (acute, chronic + s.trimp_score)
        });

    compute_report(
        acute_sum / ACUTE_WINDOW_DAYS as f64,
        chronic_sum / CHRONIC_WINDOW_DAYS as f64,
    )
}

/// Fetch an athlete's recent sessions and assess their load.
pub async fn assess_athlete(
    db: &SupabaseDb,
    athlete_id: Uuid,
    now: DateTime<Utc>,
) -> Result<LoadReport> {
    let since = window_start(now, CHRONIC_WINDOW_DAYS);
    let sessions = db.get_sessions_since(athlete_id, since).await?;
    let report = report_from_sessions(&sessions, now);

    tracing::info!(
        %athlete_id,
        sessions = sessions.len(),
        acute = report.acute_load,
        chronic = report.chronic_load,
        ratio = report.ratio,
        status = ?report.status,
        "Training load assessed"
    );

    Ok(report)
}
