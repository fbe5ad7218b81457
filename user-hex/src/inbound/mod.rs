//! Inbound Adapters
//!
//! - `server`/`handlers`: public HTTP API (full CRUD)
//! - `rpc`: service-to-service lookup surface (reads only)

mod handlers;
pub mod rpc;
mod server;

pub use handlers::AppState;
pub use platform_http::{ApiError, shutdown_signal};
pub use rpc::RpcServer;
pub use server::HttpServer;
