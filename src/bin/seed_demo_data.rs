// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Create a demo athlete with four days of history and print a dashboard
//! session token for it.

use chrono::{DateTime, Duration, Utc};
use trimp_tracker::{
    config::Config,
    logging::init_logging,
    middleware::auth::create_jwt,
    models::{ActivitySource, AthleteProfile, NewActivity, NewAthleteProfile, Sex},
    services::trimp::{calculate_trimp, TrimpError},
    AppState,
};

/// (days ago, duration in minutes, average HR)
const DEMO_SESSIONS: [(i64, f64, f64); 4] = [
    (4, 30.0, 140.0),
    (3, 50.0, 150.0),
    (2, 20.0, 130.0),
    (1, 60.0, 160.0),
];

fn demo_athlete() -> NewAthleteProfile {
    NewAthleteProfile {
        name: "Demo Athlete".to_string(),
        sex: Sex::Male,
        resting_hr: 55.0,
        max_hr: 190.0,
        strava_athlete_id: None,
        subscription_active: true,
        phone_number: None,
    }
}

fn demo_history(
    athlete: &AthleteProfile,
    now: DateTime<Utc>,
) -> Result<Vec<NewActivity>, TrimpError> {
    let profile = athlete.heart_rate_profile();
    DEMO_SESSIONS
        .iter()
        .map(|&(days_ago, duration_min, average_hr)| {
            Ok(NewActivity {
                athlete_id: athlete.id,
                strava_activity_id: None,
                name: Some(format!("Demo session ({} days ago)", days_ago)),
                duration_min,
                average_hr,
                trimp_score: calculate_trimp(duration_min, average_hr, &profile)?,
                recorded_at: now - Duration::days(days_ago),
                source: ActivitySource::Seed,
                heart_rate_estimated: false,
            })
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    let state = AppState::new(config);

    let athlete = state.db.insert_athlete(&demo_athlete()).await?;
    tracing::info!(athlete_id = %athlete.id, "Demo athlete created");

    let history = demo_history(&athlete, Utc::now())?;
    state.db.insert_activities(&history).await?;
    tracing::info!(count = history.len(), "Demo history inserted");

    let token = create_jwt(athlete.id, &state.config.jwt_signing_key)?;
    println!("athlete_id={}", athlete.id);
    println!("token={}", token);

    Ok(())
}
