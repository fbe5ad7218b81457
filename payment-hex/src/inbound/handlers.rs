//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use platform_http::ApiError;
use platform_types::{AppError, CreatePaymentRequest, PaymentId, PaymentRepository, UserId, UserLookup};

use crate::PaymentService;

/// Application state shared across handlers.
pub struct AppState<R: PaymentRepository, U: UserLookup> {
    pub service: PaymentService<R, U>,
}

fn parse_payment_id(raw: &str) -> Result<PaymentId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError(AppError::BadRequest("Invalid payment ID".into())))
}

fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError(AppError::BadRequest("Invalid user ID".into())))
}

/// Record a payment.
///
/// An unknown user is the caller's mistake here, so it is a 400 rather than
/// the 404 the per-user listing returns.
#[tracing::instrument(skip(state, payload))]
pub async fn create_payment<R: PaymentRepository, U: UserLookup>(
    State(state): State<Arc<AppState<R, U>>>,
    payload: Result<Json<CreatePaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let payment = state
        .service
        .create_payment(req)
        .await
        .map_err(|e| match e {
            AppError::UserNotFound(_) => AppError::BadRequest("user not found".into()),
            other => other,
        })?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// List all payments.
#[tracing::instrument(skip(state))]
pub async fn list_payments<R: PaymentRepository, U: UserLookup>(
    State(state): State<Arc<AppState<R, U>>>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state.service.list_payments().await?;
    Ok(Json(payments))
}

/// Get payment by ID.
#[tracing::instrument(skip(state), fields(payment_id = %id))]
pub async fn get_payment<R: PaymentRepository, U: UserLookup>(
    State(state): State<Arc<AppState<R, U>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let payment_id = parse_payment_id(&id)?;
    let payment = state.service.get_payment(payment_id).await?;
    Ok(Json(payment))
}

/// List the payments of one user.
#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn list_user_payments<R: PaymentRepository, U: UserLookup>(
    State(state): State<Arc<AppState<R, U>>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let payments = state.service.list_user_payments(user_id).await?;
    Ok(Json(payments))
}
