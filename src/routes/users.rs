// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes.

use crate::error::Result;
use crate::models::user::UserResponse;
use crate::routes::response::{ApiResponse, Caller, ValidJson};
use crate::services::users::{
    ChangePasswordRequest, EditUserRequest, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, UserListItem,
};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

/// Routes reachable without a session.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
}

/// Routes that require authentication.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/me", get(me))
        .route("/users/change-password", patch(change_password))
        .route(
            "/users/{id}",
            get(get_user).patch(edit_user).delete(delete_user),
        )
}

async fn register(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<ApiResponse<RegisterResponse>> {
    let registered = state.users.register(req).await?;
    Ok(ApiResponse::created("User registered successfully", registered))
}

async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>> {
    let session = state.users.login(req).await?;
    Ok(ApiResponse::ok("Login successful", session))
}

async fn me(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> Result<ApiResponse<UserResponse>> {
    let user = state.users.me(&caller).await?;
    Ok(ApiResponse::ok("User retrieved successfully", user))
}

async fn change_password(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    ValidJson(req): ValidJson<ChangePasswordRequest>,
) -> Result<ApiResponse<()>> {
    state.users.change_password(&caller, req).await?;
    Ok(ApiResponse::message("Password changed successfully"))
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> Result<ApiResponse<Vec<UserListItem>>> {
    let users = state.users.list_users(&caller).await?;
    Ok(ApiResponse::ok("Users retrieved successfully", users))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<ApiResponse<UserResponse>> {
    let user = state.users.get_user(&caller, &id).await?;
    Ok(ApiResponse::ok("User retrieved successfully", user))
}

async fn edit_user(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<EditUserRequest>,
) -> Result<ApiResponse<UserResponse>> {
    let user = state.users.edit_user(&caller, &id, req).await?;
    Ok(ApiResponse::ok("User updated successfully", user))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>> {
    state.users.delete_user(&caller, &id).await?;
    Ok(ApiResponse::message("User deleted successfully"))
}
