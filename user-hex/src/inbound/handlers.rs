//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use platform_http::ApiError;
use platform_types::{AppError, CreateUserRequest, UpdateUserRequest, UserId, UserRepository};

use crate::UserService;

/// Application state shared across handlers of both listeners.
pub struct AppState<R: UserRepository> {
    pub service: UserService<R>,
}

fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError(AppError::BadRequest("Invalid user ID".into())))
}

/// Create a user.
#[tracing::instrument(skip(state, payload))]
pub async fn create_user<R: UserRepository>(
    State(state): State<Arc<AppState<R>>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let user = state.service.create_user(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// List all users.
#[tracing::instrument(skip(state))]
pub async fn list_users<R: UserRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.service.list_users().await?;
    Ok(Json(users))
}

/// Get user by ID.
#[tracing::instrument(skip(state), fields(user_id = %id))]
pub async fn get_user<R: UserRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_user_id(&id)?;
    let user = state.service.get_user(user_id).await?;
    Ok(Json(user))
}

/// Partially update a user.
#[tracing::instrument(skip(state, payload), fields(user_id = %id))]
pub async fn update_user<R: UserRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_user_id(&id)?;
    let Json(req) = payload?;
    let user = state.service.update_user(user_id, req).await?;
    Ok(Json(user))
}

/// Soft delete a user.
#[tracing::instrument(skip(state), fields(user_id = %id))]
pub async fn delete_user<R: UserRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_user_id(&id)?;
    state.service.delete_user(user_id).await?;
    Ok(Json(
        serde_json::json!({ "message": "User deleted successfully" }),
    ))
}
