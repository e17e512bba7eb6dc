// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sports catalog tests.

use athletex_api::models::Role;
use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::{create_test_app, seed_athlete, seed_user, send, token_for};

async fn create_sport(app: &axum::Router, token: &str, name: &str) -> (StatusCode, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/sport",
        Some(token),
        Some(json!({ "name": name })),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap_or_default().to_string();
    (status, id)
}

#[tokio::test]
async fn test_sports_are_listed_by_name() {
    let (app, state) = create_test_app();
    let coach = seed_user(&state, Role::Coach, "Coach").await;
    let token = token_for(&state, &coach);

    for name in ["Rugby", "athletics", "Football"] {
        let (status, _) = create_sport(&app, &token, name).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/api/v1/sport", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["athletics", "Football", "Rugby"]);
}

#[tokio::test]
async fn test_only_coaches_manage_sports() {
    let (app, state) = create_test_app();
    let (athlete, _) = seed_athlete(&state, "Athlete").await;

    let (status, _) = create_sport(&app, &token_for(&state, &athlete), "Rowing").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_duplicate_name_conflicts() {
    let (app, state) = create_test_app();
    let coach = seed_user(&state, Role::Coach, "Coach").await;
    let token = token_for(&state, &coach);

    let (first, _) = create_sport(&app, &token, "Rowing").await;
    let (second, _) = create_sport(&app, &token, "rowing ").await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_rename_keeps_names_unique() {
    let (app, state) = create_test_app();
    let coach = seed_user(&state, Role::Coach, "Coach").await;
    let token = token_for(&state, &coach);

    let (_, rowing) = create_sport(&app, &token, "Rowing").await;
    create_sport(&app, &token, "Cycling").await;
    let uri = format!("/api/v1/sport/{}", rowing);

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "name": "Cycling" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "name": "Sculling" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Sculling");

    // The old name is available again
    let (status, _) = create_sport(&app, &token, "Rowing").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_delete_refused_while_referenced() {
    let (app, state) = create_test_app();
    let coach = seed_user(&state, Role::Coach, "Coach").await;
    let token = token_for(&state, &coach);
    let (_, sport_id) = create_sport(&app, &token, "Swimming").await;

    let (_, mut profile) = seed_athlete(&state, "Swimmer").await;
    profile.sport_id = Some(sport_id.clone());
    state.db.upsert_profile(&profile).await.unwrap();

    let uri = format!("/api/v1/sport/{}", sport_id);

    let (status, body) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["athletes"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(state.db.get_sport(&sport_id).await.unwrap().is_some());

    profile.sport_id = None;
    state.db.upsert_profile(&profile).await.unwrap();

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(state.db.get_sport(&sport_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_sport_is_not_found() {
    let (app, state) = create_test_app();
    let coach = seed_user(&state, Role::Coach, "Coach").await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/sport/nope",
        Some(&token_for(&state, &coach)),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Sport not found");
}
