// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Integration tests for webhook handling.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use mockito::Matcher;
use serde_json::json;
use tower::ServiceExt;

mod common;

fn verify_request(query: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(format!("/webhook{}", query))
        .body(Body::empty())
        .unwrap()
}

fn event_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn test_webhook_verification() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(verify_request(
            "?hub.mode=subscribe&hub.challenge=test_challenge_123&hub.verify_token=test_verify_token",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json, json!({ "hub.challenge": "test_challenge_123" }));
}

#[tokio::test]
async fn test_webhook_verification_without_mode() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(verify_request(
            "?hub.challenge=abc&hub.verify_token=test_verify_token",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_webhook_verification_wrong_token() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(verify_request(
            "?hub.mode=subscribe&hub.challenge=test_challenge_123&hub.verify_token=wrong_token",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = common::body_json(response).await;
    assert_eq!(json, json!({ "status": "invalid token" }));
}

#[tokio::test]
async fn test_webhook_verification_missing_params() {
    let (app, _) = common::create_test_app();

    let response = app.clone().oneshot(verify_request("")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(verify_request("?hub.verify_token=test_verify_token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_webhook_ignores_non_activity_events() {
    let (app, _) = common::create_test_app();

    let payload = json!({
        "object_type": "athlete",
        "object_id": 7,
        "aspect_type": "update",
        "owner_id": 7,
        "subscription_id": 1
    });

    let response = app
        .oneshot(event_request(payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_webhook_malformed_body_still_ok() {
    let (app, _) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(event_request("this is not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Missing object_id
    let response = app
        .oneshot(event_request(json!({"object_type": "activity"}).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_webhook_activity_full_flow() {
    let mut server = mockito::Server::new_async().await;

    let token = common::mock_token_refresh(&mut server).await;
    let activity = server
        .mock("GET", "/api/v3/activities/42")
        .match_header("authorization", "Bearer access_abc")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": 42,
                "name": "Tempo Run",
                "moving_time": 3600,
                "average_heartrate": 155.0,
                "start_date": "2026-01-15T06:30:00Z"
            })
            .to_string(),
        )
        .create_async()
        .await;
    let athlete = common::mock_athlete_by_owner(
        &mut server,
        common::STRAVA_OWNER_ID,
        json!([common::athlete_row(Some("+15550001111"))]),
    )
    .await;
    let upsert = server
        .mock("POST", "/rest/v1/activities")
        .match_query(Matcher::UrlEncoded(
            "on_conflict".into(),
            "strava_activity_id".into(),
        ))
        .match_header("prefer", "resolution=merge-duplicates,return=minimal")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""strava_activity_id":42"#.into()),
            Matcher::Regex(r#""trimp_score":117.94"#.into()),
            Matcher::Regex(r#""heart_rate_estimated":false"#.into()),
            Matcher::Regex(r#""source":"webhook""#.into()),
        ]))
        .with_status(201)
        .create_async()
        .await;
    let whatsapp = server
        .mock("POST", "/2010-04-01/Accounts/ACtest/Messages.json")
        .match_header("authorization", Matcher::Regex("^Basic ".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("To".into(), "whatsapp:+15550001111".into()),
            Matcher::UrlEncoded("From".into(), "whatsapp:+14155238886".into()),
            Matcher::Regex("117.94".into()),
        ]))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({"sid": "SM123"}).to_string())
        .create_async()
        .await;

    let (app, _) = common::create_app(common::mocked_config(&server));
    let payload = json!({
        "object_type": "activity",
        "object_id": 42,
        "aspect_type": "create",
        "owner_id": common::STRAVA_OWNER_ID,
        "subscription_id": 1
    });

    let response = app
        .oneshot(event_request(payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    token.assert_async().await;
    activity.assert_async().await;
    athlete.assert_async().await;
    upsert.assert_async().await;
    whatsapp.assert_async().await;
}

#[tokio::test]
async fn test_webhook_missing_heart_rate_uses_placeholder() {
    let mut server = mockito::Server::new_async().await;

    let _token = common::mock_token_refresh(&mut server).await;
    let _activity = server
        .mock("GET", "/api/v3/activities/43")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": 43, "name": "Commute", "moving_time": 1800}).to_string())
        .create_async()
        .await;
    let _athlete = common::mock_athlete_by_owner(
        &mut server,
        common::STRAVA_OWNER_ID,
        json!([common::athlete_row(None)]),
    )
    .await;
    let upsert = server
        .mock("POST", "/rest/v1/activities")
        .match_query(Matcher::Any)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""average_hr":130.0"#.into()),
            Matcher::Regex(r#""heart_rate_estimated":true"#.into()),
        ]))
        .with_status(201)
        .create_async()
        .await;
    // No phone number and no fallback destination configured
    let whatsapp = server
        .mock("POST", Matcher::Regex("^/2010-04-01/".into()))
        .expect(0)
        .create_async()
        .await;

    let (app, _) = common::create_app(common::mocked_config(&server));
    let payload = json!({
        "object_type": "activity",
        "object_id": 43,
        "owner_id": common::STRAVA_OWNER_ID
    });

    let response = app
        .oneshot(event_request(payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    upsert.assert_async().await;
    whatsapp.assert_async().await;
}

#[tokio::test]
async fn test_webhook_falls_back_to_default_athlete() {
    let mut server = mockito::Server::new_async().await;

    let _token = common::mock_token_refresh(&mut server).await;
    let _activity = server
        .mock("GET", "/api/v3/activities/44")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"id": 44, "moving_time": 2400, "average_heartrate": 140.0}).to_string(),
        )
        .create_async()
        .await;
    let by_owner = common::mock_athlete_by_owner(&mut server, 999, json!([])).await;
    let by_id =
        common::mock_athlete_by_id(&mut server, json!([common::athlete_row(None)])).await;
    let upsert = server
        .mock("POST", "/rest/v1/activities")
        .match_query(Matcher::Any)
        .match_body(Matcher::Regex(format!(
            r#""athlete_id":"{}""#,
            common::ATHLETE_ID
        )))
        .with_status(201)
        .create_async()
        .await;

    let mut config = common::mocked_config(&server);
    config.default_athlete_id = Some(common::athlete_id());
    let (app, _) = common::create_app(config);

    let payload = json!({"object_type": "activity", "object_id": 44, "owner_id": 999});
    let response = app
        .oneshot(event_request(payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    by_owner.assert_async().await;
    by_id.assert_async().await;
    upsert.assert_async().await;
}

#[tokio::test]
async fn test_webhook_strava_failure_drops_event() {
    let mut server = mockito::Server::new_async().await;

    let _token = common::mock_token_refresh(&mut server).await;
    let activity = server
        .mock("GET", "/api/v3/activities/45")
        .with_status(404)
        .with_body(r#"{"message":"Record Not Found"}"#)
        .create_async()
        .await;
    let upsert = server
        .mock("POST", "/rest/v1/activities")
        .expect(0)
        .create_async()
        .await;

    let (app, _) = common::create_app(common::mocked_config(&server));
    let payload = json!({"object_type": "activity", "object_id": 45, "owner_id": 7});

    let response = app
        .oneshot(event_request(payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json["status"], "ok");
    activity.assert_async().await;
    upsert.assert_async().await;
}

#[tokio::test]
async fn test_webhook_notification_failure_keeps_activity() {
    let mut server = mockito::Server::new_async().await;

    let _token = common::mock_token_refresh(&mut server).await;
    let _activity = server
        .mock("GET", "/api/v3/activities/46")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"id": 46, "moving_time": 3600, "average_heartrate": 150.0}).to_string(),
        )
        .create_async()
        .await;
    let _athlete = common::mock_athlete_by_owner(
        &mut server,
        common::STRAVA_OWNER_ID,
        json!([common::athlete_row(Some("+15550001111"))]),
    )
    .await;
    let upsert = server
        .mock("POST", "/rest/v1/activities")
        .match_query(Matcher::Any)
        .with_status(201)
        .create_async()
        .await;
    let whatsapp = server
        .mock("POST", "/2010-04-01/Accounts/ACtest/Messages.json")
        .with_status(401)
        .with_body(r#"{"code":20003,"message":"Authenticate"}"#)
        .create_async()
        .await;

    let (app, _) = common::create_app(common::mocked_config(&server));
    let payload = json!({"object_type": "activity", "object_id": 46, "owner_id": 7});

    let response = app
        .oneshot(event_request(payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    upsert.assert_async().await;
    whatsapp.assert_async().await;
}

#[tokio::test]
async fn test_webhook_inactive_subscription_stores_without_notifying() {
    let mut server = mockito::Server::new_async().await;

    let _token = common::mock_token_refresh(&mut server).await;
    let _activity = server
        .mock("GET", "/api/v3/activities/47")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"id": 47, "moving_time": 3600, "average_heartrate": 150.0}).to_string(),
        )
        .create_async()
        .await;
    let mut row = common::athlete_row(Some("+15550001111"));
    row["subscription_active"] = json!(false);
    let _athlete =
        common::mock_athlete_by_owner(&mut server, common::STRAVA_OWNER_ID, json!([row])).await;
    let upsert = server
        .mock("POST", "/rest/v1/activities")
        .match_query(Matcher::Any)
        .with_status(201)
        .create_async()
        .await;
    let whatsapp = server
        .mock("POST", Matcher::Regex("^/2010-04-01/".into()))
        .expect(0)
        .create_async()
        .await;

    let (app, _) = common::create_app(common::mocked_config(&server));
    let payload = json!({"object_type": "activity", "object_id": 47, "owner_id": 7});

    let response = app
        .oneshot(event_request(payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    upsert.assert_async().await;
    whatsapp.assert_async().await;
}

#[tokio::test]
async fn test_webhook_missing_activity_keeps_cached_token() {
    let mut server = mockito::Server::new_async().await;

    let token = common::mock_token_refresh(&mut server).await;
    let missing = server
        .mock("GET", "/api/v3/activities/48")
        .with_status(404)
        .with_body(
            json!({
                "message": "Record Not Found",
                "errors": [{"resource": "Activity", "field": "id", "code": "invalid"}]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let second = server
        .mock("GET", "/api/v3/activities/49")
        .with_status(404)
        .with_body(r#"{"message":"Record Not Found"}"#)
        .create_async()
        .await;

    let (app, _) = common::create_app(common::mocked_config(&server));

    for object_id in [48, 49] {
        let payload = json!({"object_type": "activity", "object_id": object_id, "owner_id": 7});
        let response = app
            .clone()
            .oneshot(event_request(payload.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    missing.assert_async().await;
    second.assert_async().await;
    // One refresh: the 404 did not invalidate the cached token
    token.assert_async().await;
}
