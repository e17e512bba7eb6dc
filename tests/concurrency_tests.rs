// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Concurrent submissions racing for the same unique slot.
//!
//! Exactly one request may win; every other one must see a Conflict and
//! nothing extra may be persisted.

use athletex_api::db::keys;
use athletex_api::error::AppError;
use athletex_api::models::Role;
use athletex_api::services::daily_logs::NewDailyLog;
use axum::http::{Method, StatusCode};
use chrono::NaiveDate;
use serde_json::json;

mod common;
use common::{create_test_app, log_body, seed_athlete, seed_user, send, token_for};

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_daily_logs_persist_once() {
    let (app, state) = create_test_app();
    let (athlete, profile) = seed_athlete(&state, "Athlete").await;
    let token = token_for(&state, &athlete);

    let mut handles = Vec::new();
    for _ in 0..32 {
        let app = app.clone();
        let token = token.clone();
        let body = log_body(&profile.id, "2025-01-01");
        handles.push(tokio::spawn(async move {
            send(&app, Method::POST, "/api/v1/daily-logs", Some(&token), Some(body))
                .await
                .0
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 31);
    assert_eq!(
        state
            .db
            .daily_logs_for_athlete(&profile.id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_logs_on_different_days_all_succeed() {
    let (app, state) = create_test_app();
    let (athlete, profile) = seed_athlete(&state, "Athlete").await;
    let token = token_for(&state, &athlete);

    let mut handles = Vec::new();
    for day in 1..=20 {
        let app = app.clone();
        let token = token.clone();
        let body = log_body(&profile.id, &format!("2025-03-{:02}", day));
        handles.push(tokio::spawn(async move {
            send(&app, Method::POST, "/api/v1/daily-logs", Some(&token), Some(body))
                .await
                .0
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }
    assert_eq!(
        state
            .db
            .daily_logs_for_athlete(&profile.id)
            .await
            .unwrap()
            .len(),
        20
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_sport_creation_persists_once() {
    let (app, state) = create_test_app();
    let coach = seed_user(&state, Role::Coach, "Coach").await;
    let token = token_for(&state, &coach);

    let mut handles = Vec::new();
    for i in 0..12 {
        let app = app.clone();
        let token = token.clone();
        // Same name modulo case and whitespace
        let name = if i % 2 == 0 { "Basketball" } else { "  basketball " };
        handles.push(tokio::spawn(async move {
            send(
                &app,
                Method::POST,
                "/api/v1/sport",
                Some(&token),
                Some(json!({ "name": name })),
            )
            .await
            .0
        }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap() == StatusCode::CREATED {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(state.db.list_sports().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_account_deletion_racing_log_creation_leaves_nothing_behind() {
    let (_, state) = create_test_app();

    for _ in 0..20 {
        let (athlete, profile) = seed_athlete(&state, "Athlete").await;

        let mut creates = Vec::new();
        for day in 1..=6 {
            let state = state.clone();
            let athlete = athlete.clone();
            let input: NewDailyLog =
                serde_json::from_value(log_body(&profile.id, &format!("2025-05-{:02}", day)))
                    .unwrap();
            creates.push(tokio::spawn(async move {
                state.daily_logs.create(&athlete, input).await
            }));
        }
        let purge = {
            let state = state.clone();
            let athlete = athlete.clone();
            tokio::spawn(async move { state.users.delete_user(&athlete, &athlete.id).await })
        };

        for handle in creates {
            match handle.await.unwrap() {
                Ok(_) | Err(AppError::NotFound(_)) | Err(AppError::Forbidden(_)) => {}
                Err(other) => panic!("unexpected error {:?}", other),
            }
        }
        purge.await.unwrap().unwrap();

        assert!(state
            .db
            .daily_logs_for_athlete(&profile.id)
            .await
            .unwrap()
            .is_empty());
        for day in 1..=6 {
            let key = keys::daily_log(&profile.id, NaiveDate::from_ymd_opt(2025, 5, day).unwrap());
            assert!(state.db.claim_key(&key, "next-owner").await.unwrap());
        }
    }
}
