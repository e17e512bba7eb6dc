// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Athlete profile routes.

use crate::error::Result;
use crate::models::athlete::AthleteListing;
use crate::routes::response::{ApiResponse, Caller};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/athlete", get(list_athletes))
        .route("/athlete/{id}", delete(delete_athlete))
}

async fn list_athletes(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> Result<ApiResponse<Vec<AthleteListing>>> {
    let athletes = state.athletes.list_athletes(&caller).await?;
    Ok(ApiResponse::ok("Athletes retrieved successfully", athletes))
}

async fn delete_athlete(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>> {
    state.athletes.delete_athlete(&caller, &id).await?;
    Ok(ApiResponse::message("Athlete deleted successfully"))
}
