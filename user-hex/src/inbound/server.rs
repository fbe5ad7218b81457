//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use platform_http::shutdown_signal;
use platform_types::UserRepository;

use super::handlers::{self, AppState};
use crate::UserService;

/// HTTP Server for the public Users API.
pub struct HttpServer<R: UserRepository> {
    state: Arc<AppState<R>>,
}

impl<R: UserRepository> HttpServer<R> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: UserService<R>) -> Self {
        Self::from_state(Arc::new(AppState { service }))
    }

    /// Creates a server over state shared with another listener.
    pub fn from_state(state: Arc<AppState<R>>) -> Self {
        Self { state }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(platform_http::health))
            .route(
                "/users",
                post(handlers::create_user::<R>).get(handlers::list_users::<R>),
            )
            .route(
                "/users/{id}",
                get(handlers::get_user::<R>)
                    .put(handlers::update_user::<R>)
                    .delete(handlers::delete_user::<R>),
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
