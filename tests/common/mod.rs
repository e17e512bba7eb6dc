// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use athletex_api::config::Config;
use athletex_api::db::{Database, FirestoreDb};
use athletex_api::middleware::auth::create_jwt;
use athletex_api::models::athlete::{compute_bmi, RiskLevel};
use athletex_api::models::{AthleteProfile, Role, User};
use athletex_api::routes::create_router;
use athletex_api::AppState;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app backed by the in-process store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), Database::in_memory()));
    (create_router(state.clone()), state)
}

/// Insert a user directly, skipping password hashing.
#[allow(dead_code)]
pub async fn seed_user(state: &AppState, role: Role, name: &str) -> User {
    let now = chrono::Utc::now();
    let id = uuid::Uuid::new_v4().to_string();
    let user = User {
        email: format!(
            "{}-{}@example.com",
            name.to_lowercase().replace(' ', "."),
            &id[..8]
        ),
        id,
        full_name: name.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        role,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    state.db.upsert_user(&user).await.unwrap();
    assert!(state
        .db
        .claim_key(&athletex_api::db::keys::email(&user.email), &user.id)
        .await
        .unwrap());
    user
}

/// Insert an athlete user together with their profile.
#[allow(dead_code)]
pub async fn seed_athlete(state: &AppState, name: &str) -> (User, AthleteProfile) {
    let user = seed_user(state, Role::Athlete, name).await;
    let now = chrono::Utc::now();
    let profile = AthleteProfile {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        age: 21,
        gender: "female".to_string(),
        height: 175.0,
        weight: 68.0,
        bmi: compute_bmi(68.0, 175.0),
        risk_level: RiskLevel::Low,
        risk_score: 0.0,
        sport_id: None,
        training_type: None,
        experience_level: None,
        limitations: None,
        created_at: now,
        updated_at: now,
    };
    state.db.upsert_profile(&profile).await.unwrap();
    (user, profile)
}

/// Assign `athlete` to `coach` through the relationship service.
#[allow(dead_code)]
pub async fn assign(state: &AppState, coach: &User, athlete: &User) -> String {
    state
        .relationships
        .assign(coach, &athlete.id, None)
        .await
        .unwrap()
        .id
}

/// Mint a session token for `user`.
#[allow(dead_code)]
pub fn token_for(state: &AppState, user: &User) -> String {
    create_jwt(&user.id, &state.config.jwt_signing_key, 24).unwrap()
}

/// Send a request and return status plus parsed JSON body (`Null` if empty).
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Body of a daily log for `athlete_profile_id` on `date`.
#[allow(dead_code)]
pub fn log_body(athlete_profile_id: &str, date: &str) -> Value {
    serde_json::json!({
        "athleteId": athlete_profile_id,
        "date": date,
        "kneePain": 3,
        "legFreshness": 7,
        "sleepHours": 8.0,
        "trainingIntensity": 6,
        "aclInjuryScore": 12.5,
        "stiffnessLevel": 2,
        "calorieIntake": 2400
    })
}
