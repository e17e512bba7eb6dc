// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sports catalog routes. Listing is public; everything else needs a session.

use crate::error::Result;
use crate::models::SportsCategory;
use crate::routes::response::{ApiResponse, Caller, ValidJson};
use crate::services::sports::{SportDetail, SportRequest};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/sport", get(list_sports))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/sport", post(create_sport)).route(
        "/sport/{id}",
        get(get_sport).put(update_sport).delete(delete_sport),
    )
}

async fn list_sports(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<Vec<SportsCategory>>> {
    let sports = state.sports.list().await?;
    Ok(ApiResponse::ok("Sports retrieved successfully", sports))
}

async fn get_sport(
    State(state): State<Arc<AppState>>,
    Caller(_caller): Caller,
    Path(id): Path<String>,
) -> Result<ApiResponse<SportDetail>> {
    let sport = state.sports.get(&id).await?;
    Ok(ApiResponse::ok("Sport retrieved successfully", sport))
}

async fn create_sport(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    ValidJson(req): ValidJson<SportRequest>,
) -> Result<ApiResponse<SportsCategory>> {
    let sport = state.sports.create(&caller, req).await?;
    Ok(ApiResponse::created("Sport created successfully", sport))
}

async fn update_sport(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<SportRequest>,
) -> Result<ApiResponse<SportsCategory>> {
    let sport = state.sports.update(&caller, &id, req).await?;
    Ok(ApiResponse::ok("Sport updated successfully", sport))
}

async fn delete_sport(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>> {
    state.sports.delete(&caller, &id).await?;
    Ok(ApiResponse::message("Sport deleted successfully"))
}
