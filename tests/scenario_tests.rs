// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Full coach/athlete walkthrough over HTTP, starting from registration.

use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::{create_test_app, send};

#[tokio::test]
async fn test_coach_athlete_walkthrough() {
    let (app, _) = create_test_app();

    // Register an athlete; BMI is derived server-side
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users/register",
        None,
        Some(json!({
            "fullName": "Jamie Runner",
            "email": "Jamie@Example.com",
            "password": "athlete-pass-1",
            "role": "ATHLETE",
            "age": 21,
            "gender": "female",
            "height": 175,
            "weight": 68
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let athlete_user_id = body["data"]["id"].as_str().unwrap().to_string();
    let athlete_profile_id = body["data"]["athleteId"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users/register",
        None,
        Some(json!({
            "fullName": "Casey Coach",
            "email": "coach@example.com",
            "password": "coach-pass-1",
            "role": "COACH"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"].get("athleteId").is_none());

    // Log in both
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users/login",
        None,
        Some(json!({ "email": "jamie@example.com", "password": "athlete-pass-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "ATHLETE");
    let athlete_token = body["data"]["token"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/v1/users/login",
        None,
        Some(json!({ "email": "coach@example.com", "password": "coach-pass-1" })),
    )
    .await;
    let coach_token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/users/me",
        Some(&athlete_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["athleteProfile"]["bmi"], 22.2);

    // Coach assigns the athlete and sees them
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/coach-athlete/assign",
        Some(&coach_token),
        Some(json!({ "athleteId": athlete_user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let relationship_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/coach-athlete/coach/athletes",
        Some(&coach_token),
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, Method::GET, "/api/v1/athlete", Some(&coach_token), None).await;
    let athletes = body["data"].as_array().unwrap();
    assert_eq!(athletes.len(), 1);
    assert_eq!(athletes[0]["id"], athlete_profile_id.as_str());
    assert!(athletes[0]["assignedDate"].is_string());

    // Athlete logs a day; a second log for the same day is refused
    let log = json!({
        "athleteId": athlete_profile_id,
        "date": "2025-01-01",
        "kneePain": 2,
        "legFreshness": 8,
        "sleepHours": 7.5,
        "trainingIntensity": 5,
        "aclInjuryScore": 10,
        "stiffnessLevel": 1,
        "calorieIntake": 2200
    });
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/daily-logs",
        Some(&athlete_token),
        Some(log.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/daily-logs",
        Some(&athlete_token),
        Some(log),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The assigned coach can read the athlete's logs
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/daily-logs?athleteId={}", athlete_profile_id),
        Some(&coach_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["dailyLogs"].as_array().unwrap().len(), 1);

    // Removing the relationship empties the coach's list and revokes access
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/coach-athlete/{}", relationship_id),
        Some(&coach_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/coach-athlete/coach/athletes",
        Some(&coach_token),
        None,
    )
    .await;
    assert_eq!(body["data"], json!([]));

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/daily-logs?athleteId={}", athlete_profile_id),
        Some(&coach_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
