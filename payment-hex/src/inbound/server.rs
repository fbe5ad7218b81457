//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use platform_http::shutdown_signal;
use platform_types::{PaymentRepository, UserLookup};

use super::handlers::{self, AppState};
use crate::PaymentService;

/// HTTP Server for the Payments API.
pub struct HttpServer<R: PaymentRepository, U: UserLookup> {
    state: Arc<AppState<R, U>>,
}

impl<R: PaymentRepository, U: UserLookup> HttpServer<R, U> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: PaymentService<R, U>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(platform_http::health))
            .route(
                "/payments",
                post(handlers::create_payment::<R, U>).get(handlers::list_payments::<R, U>),
            )
            .route("/payments/{id}", get(handlers::get_payment::<R, U>))
            .route(
                "/payments/user/{user_id}",
                get(handlers::list_user_payments::<R, U>),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}
