//! RPC Inbound Adapter
//!
//! Service-to-service surface of the user service. Exposes exactly two reads,
//! lookup-by-id and lookup-by-email, on their own listener. Nothing here can
//! create, update or delete a user: only the owning service mutates users.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use platform_http::shutdown_signal;
use platform_types::{
    AppError, RemoteUser, RpcCode, RpcStatus, UserRepository,
    rpc::{GET_USER_BY_EMAIL_PATH, GET_USER_PATH, GetUserByEmailRequest, GetUserRequest, HEALTH_PATH},
};

use super::handlers::AppState;

/// Failed RPC, rendered as a standardized status body.
pub struct RpcError(pub RpcStatus);

impl RpcError {
    fn new(code: RpcCode, message: impl Into<String>) -> Self {
        Self(RpcStatus {
            code,
            message: message.into(),
        })
    }
}

impl From<AppError> for RpcError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(msg) => RpcError::new(RpcCode::NotFound, format!("user not found: {msg}")),
            AppError::UserNotFound(id) => {
                RpcError::new(RpcCode::NotFound, format!("user not found: {id}"))
            }
            other => RpcError::new(RpcCode::Internal, other.to_string()),
        }
    }
}

impl From<JsonRejection> for RpcError {
    fn from(rejection: JsonRejection) -> Self {
        RpcError::new(RpcCode::InvalidArgument, rejection.body_text())
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = match self.0.code {
            RpcCode::NotFound => StatusCode::NOT_FOUND,
            RpcCode::InvalidArgument => StatusCode::BAD_REQUEST,
            RpcCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self.0)).into_response()
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "serving" }))
}

#[tracing::instrument(skip(state, payload))]
async fn get_user<R: UserRepository>(
    State(state): State<Arc<AppState<R>>>,
    payload: Result<Json<GetUserRequest>, JsonRejection>,
) -> Result<Json<RemoteUser>, RpcError> {
    let Json(req) = payload?;
    tracing::debug!(user_id = %req.id, "RPC GetUser");
    let user = state.service.get_user(req.id).await?;
    Ok(Json(user.into()))
}

#[tracing::instrument(skip(state, payload))]
async fn get_user_by_email<R: UserRepository>(
    State(state): State<Arc<AppState<R>>>,
    payload: Result<Json<GetUserByEmailRequest>, JsonRejection>,
) -> Result<Json<RemoteUser>, RpcError> {
    let Json(req) = payload?;
    tracing::debug!(email = %req.email, "RPC GetUserByEmail");
    let user = state.service.get_user_by_email(&req.email).await?;
    Ok(Json(user.into()))
}

/// RPC server for user lookups.
pub struct RpcServer<R: UserRepository> {
    state: Arc<AppState<R>>,
}

impl<R: UserRepository> RpcServer<R> {
    /// Creates an RPC server over state shared with the HTTP listener.
    pub fn from_state(state: Arc<AppState<R>>) -> Self {
        Self { state }
    }

    /// Builds the router with the lookup operations.
    pub fn router(&self) -> Router {
        Router::new()
            .route(HEALTH_PATH, get(health))
            .route(GET_USER_PATH, post(get_user::<R>))
            .route(GET_USER_BY_EMAIL_PATH, post(get_user_by_email::<R>))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serves on an already bound listener until shutdown.
    pub async fn serve(self, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
        tracing::info!("RPC server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }

    /// Binds the given address and serves until shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        self.serve(listener).await
    }
}
