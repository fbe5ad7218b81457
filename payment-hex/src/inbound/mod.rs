//! Inbound Adapters
//!
//! - `server`: Axum HTTP server with routes and middleware
//! - `handlers`: request handlers for the payments API

mod handlers;
mod server;

pub use handlers::AppState;
pub use platform_http::{ApiError, shutdown_signal};
pub use server::HttpServer;
