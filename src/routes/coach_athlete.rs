// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coach-athlete assignment routes.

use crate::error::Result;
use crate::models::relationship::RelationshipView;
use crate::routes::response::{ApiResponse, Caller, ValidJson};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/coach-athlete", get(list_all))
        .route("/coach-athlete/assign", post(assign))
        .route("/coach-athlete/coach/athletes", get(coach_athletes))
        .route("/coach-athlete/athlete/coaches", get(athlete_coaches))
        .route("/coach-athlete/{id}", delete(remove))
}

/// Body of `POST /coach-athlete/assign`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct AssignRequest {
    /// Athlete user ID
    #[validate(length(min = 1, message = "Athlete ID is required"))]
    athlete_id: String,
    /// Defaults to the caller
    coach_id: Option<String>,
}

async fn assign(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    ValidJson(req): ValidJson<AssignRequest>,
) -> Result<ApiResponse<RelationshipView>> {
    let relationship = state
        .relationships
        .assign(&caller, &req.athlete_id, req.coach_id.as_deref())
        .await?;
    Ok(ApiResponse::created(
        "Athlete assigned to coach successfully",
        relationship,
    ))
}

async fn coach_athletes(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> Result<ApiResponse<Vec<RelationshipView>>> {
    let athletes = state.relationships.list_for_coach(&caller.id).await?;
    Ok(ApiResponse::ok("Coach athletes retrieved successfully", athletes))
}

async fn athlete_coaches(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> Result<ApiResponse<Vec<RelationshipView>>> {
    let coaches = state.relationships.list_for_athlete(&caller.id).await?;
    Ok(ApiResponse::ok("Athlete coaches retrieved successfully", coaches))
}

async fn list_all(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> Result<ApiResponse<Vec<RelationshipView>>> {
    let relationships = state.relationships.list_all(&caller).await?;
    Ok(ApiResponse::ok(
        "Coach-athlete relationships retrieved successfully",
        relationships,
    ))
}

async fn remove(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>> {
    state.relationships.remove(&id, &caller.id).await?;
    Ok(ApiResponse::message(
        "Athlete removed from coach successfully",
    ))
}
