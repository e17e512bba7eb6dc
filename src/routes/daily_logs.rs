// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily log routes.

use crate::error::Result;
use crate::models::daily_log::DailyLogView;
use crate::models::WeeklySummary;
use crate::routes::response::{ApiResponse, Caller, ValidJson, ValidQuery};
use crate::services::daily_logs::{DailyLogFilter, DailyLogList, DailyLogPatch, NewDailyLog};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/daily-logs", get(list_logs).post(create_log))
        .route("/daily-logs/summary", get(weekly_summary))
        .route(
            "/daily-logs/{id}",
            get(get_log).put(update_log).delete(delete_log),
        )
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct SummaryQuery {
    #[validate(length(min = 1, message = "Athlete ID is required"))]
    athlete_id: String,
}

async fn create_log(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    ValidJson(req): ValidJson<NewDailyLog>,
) -> Result<ApiResponse<DailyLogView>> {
    let log = state.daily_logs.create(&caller, req).await?;
    Ok(ApiResponse::created("Daily log created successfully", log))
}

async fn list_logs(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    ValidQuery(filter): ValidQuery<DailyLogFilter>,
) -> Result<ApiResponse<DailyLogList>> {
    let logs = state.daily_logs.list(&caller, filter).await?;
    Ok(ApiResponse::ok("Daily logs retrieved successfully", logs))
}

async fn weekly_summary(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    ValidQuery(query): ValidQuery<SummaryQuery>,
) -> Result<ApiResponse<WeeklySummary>> {
    let summary = state
        .daily_logs
        .weekly_summary(&caller, &query.athlete_id)
        .await?;
    Ok(ApiResponse::ok("Weekly summary retrieved successfully", summary))
}

async fn get_log(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<ApiResponse<DailyLogView>> {
    let log = state.daily_logs.get(&caller, &id).await?;
    Ok(ApiResponse::ok("Daily log retrieved successfully", log))
}

async fn update_log(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    ValidJson(patch): ValidJson<DailyLogPatch>,
) -> Result<ApiResponse<DailyLogView>> {
    let log = state.daily_logs.update(&caller, &id, patch).await?;
    Ok(ApiResponse::ok("Daily log updated successfully", log))
}

async fn delete_log(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>> {
    state.daily_logs.delete(&caller, &id).await?;
    Ok(ApiResponse::message("Daily log deleted successfully"))
}
