// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook routes for Strava events.

use crate::models::{ActivitySource, StravaEvent};
use crate::services::ActivityProcessor;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/webhook", get(verify).post(handle_event))
}

/// Strava webhook verification query params.
#[derive(Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
}

fn token_matches(received: &str, expected: &str) -> bool {
    received.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Verify webhook subscription (GET).
async fn verify(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerifyParams>,
) -> impl IntoResponse {
    match (params.challenge, params.verify_token) {
        (Some(challenge), Some(token))
            if token_matches(&token, &state.config.webhook_verify_token) =>
        {
            tracing::info!("Webhook subscription verified");
            (StatusCode::OK, Json(json!({ "hub.challenge": challenge })))
        }
        _ => {
            tracing::warn!(
                mode = params.mode.as_deref().unwrap_or(""),
                "Webhook verification failed: invalid token"
            );
            (
                StatusCode::FORBIDDEN,
                Json(json!({ "status": "invalid token" })),
            )
        }
    }
}

/// Handle incoming webhook events (POST).
///
/// The body is parsed by hand so that malformed deliveries still get 200;
/// Strava retries anything else.
async fn handle_event(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    let ok = (StatusCode::OK, Json(json!({ "status": "ok" })));

    let event: StravaEvent = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse webhook event");
            return ok;
        }
    };

    tracing::info!(
        object_type = %event.object_type,
        object_id = event.object_id,
        aspect_type = event.aspect_type.as_deref().unwrap_or(""),
        owner_id = ?event.owner_id,
        subscription_id = ?event.subscription_id,
        "Webhook event received"
    );

    if !event.is_new_activity() {
        tracing::debug!(
            object_type = %event.object_type,
            aspect_type = event.aspect_type.as_deref().unwrap_or(""),
            "Ignoring unhandled event type"
        );
        return ok;
    }

    let processor = ActivityProcessor::from_state(&state);
    match processor
        .process_activity(event.owner_id, event.object_id, ActivitySource::Webhook)
        .await
    {
        Ok(result) => tracing::info!(
            activity_id = result.activity_id,
            trimp = result.trimp_score,
            notified = result.notified,
            "Webhook activity processed"
        ),
        Err(e) => tracing::error!(
            error = %e,
            activity_id = event.object_id,
            "Failed to process webhook activity"
        ),
    }

    ok
}
