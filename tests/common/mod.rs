// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use chrono::{DateTime, Duration, Utc};
use mockito::{Mock, ServerGuard};
use serde_json::{json, Value};
use std::sync::Arc;
use trimp_tracker::config::Config;
use trimp_tracker::middleware::auth::create_jwt;
use trimp_tracker::routes::create_router;
use trimp_tracker::time_utils::format_utc_rfc3339;
use trimp_tracker::AppState;
use uuid::Uuid;

/// Athlete used throughout the integration tests.
#[allow(dead_code)]
pub const ATHLETE_ID: &str = "7b606745-96e8-446f-8576-a18a3b4abf30";

/// Strava owner ID linked to [`ATHLETE_ID`].
#[allow(dead_code)]
pub const STRAVA_OWNER_ID: u64 = 7;

/// Access token handed out by the mocked Strava OAuth endpoint.
#[allow(dead_code)]
pub const ACCESS_TOKEN: &str = "access_abc";

#[allow(dead_code)]
pub fn athlete_id() -> Uuid {
    Uuid::parse_str(ATHLETE_ID).unwrap()
}

/// Config with every collaborator pointed at one mock server.
#[allow(dead_code)]
pub fn mocked_config(server: &ServerGuard) -> Config {
    let base = server.url();
    let mut config = Config::test_default();
    config.supabase_url = base.clone();
    config.strava_api_url = format!("{}/api/v3", base);
    config.strava_oauth_url = format!("{}/oauth", base);
    config.twilio_api_url = base.clone();
    config.twilio_account_sid = Some("ACtest".to_string());
    config.twilio_auth_token = Some("twilio_token".to_string());
    config.llm_base_url = format!("{}/v1", base);
    config
}

/// Build the router and shared state for a config.
#[allow(dead_code)]
pub fn create_app(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config));
    (create_router(state.clone()), state)
}

/// Create a test app whose collaborators are all unreachable.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_app(Config::test_default())
}

/// Bearer header value for the test athlete.
#[allow(dead_code)]
pub fn bearer(state: &AppState) -> String {
    let token = create_jwt(athlete_id(), &state.config.jwt_signing_key).unwrap();
    format!("Bearer {}", token)
}

#[allow(dead_code)]
pub fn authed_get(uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, auth)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn authed_post(uri: &str, auth: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, auth)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Athlete profile row as PostgREST returns it.
#[allow(dead_code)]
pub fn athlete_row(phone_number: Option<&str>) -> Value {
    json!({
        "id": ATHLETE_ID,
        "name": "Ana",
        "sex": "M",
        "resting_hr": 55,
        "max_hr": 190,
        "strava_athlete_id": STRAVA_OWNER_ID,
        "subscription_active": true,
        "phone_number": phone_number
    })
}

/// Mock the athlete lookup by primary key.
#[allow(dead_code)]
pub async fn mock_athlete_by_id(server: &mut ServerGuard, rows: Value) -> Mock {
    server
        .mock("GET", "/rest/v1/athlete_profiles")
        .match_query(mockito::Matcher::UrlEncoded(
            "id".into(),
            format!("eq.{}", ATHLETE_ID),
        ))
        .match_header("apikey", "test_service_key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(rows.to_string())
        .create_async()
        .await
}

/// Mock the athlete lookup by Strava owner.
#[allow(dead_code)]
pub async fn mock_athlete_by_owner(server: &mut ServerGuard, owner_id: u64, rows: Value) -> Mock {
    server
        .mock("GET", "/rest/v1/athlete_profiles")
        .match_query(mockito::Matcher::UrlEncoded(
            "strava_athlete_id".into(),
            format!("eq.{}", owner_id),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(rows.to_string())
        .create_async()
        .await
}

/// Mock a successful Strava token refresh.
#[allow(dead_code)]
pub async fn mock_token_refresh(server: &mut ServerGuard) -> Mock {
    let expires_at = (Utc::now() + Duration::hours(6)).timestamp();
    server
        .mock("POST", "/oauth/token")
        .match_body(mockito::Matcher::UrlEncoded(
            "grant_type".into(),
            "refresh_token".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "access_token": ACCESS_TOKEN,
                "refresh_token": "test_refresh_token",
                "expires_at": expires_at
            })
            .to_string(),
        )
        .create_async()
        .await
}

/// Scored session row `days_ago` days (plus an hour) before now.
#[allow(dead_code)]
pub fn session_row(days_ago: i64, trimp_score: f64) -> Value {
    let recorded_at: DateTime<Utc> = Utc::now() - Duration::days(days_ago) - Duration::hours(1);
    json!({
        "trimp_score": trimp_score,
        "recorded_at": format_utc_rfc3339(recorded_at)
    })
}

/// Mock the rolling-window session query.
#[allow(dead_code)]
pub async fn mock_sessions(server: &mut ServerGuard, rows: Value) -> Mock {
    server
        .mock("GET", "/rest/v1/activities")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("select".into(), "trimp_score,recorded_at".into()),
            mockito::Matcher::UrlEncoded("athlete_id".into(), format!("eq.{}", ATHLETE_ID)),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(rows.to_string())
        .create_async()
        .await
}
