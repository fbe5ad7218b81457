//! Wire types for the user lookup RPC surface.
//!
//! The user service serves these on its RPC listener; the payment service
//! consumes them through its remote lookup client. Only reads are exposed.

use serde::{Deserialize, Serialize};

use crate::domain::UserId;
use crate::dto::UserResponse;

/// Route of the lookup-by-id operation.
pub const GET_USER_PATH: &str = "/rpc/user.UserService/GetUser";
/// Route of the lookup-by-email operation.
pub const GET_USER_BY_EMAIL_PATH: &str = "/rpc/user.UserService/GetUserByEmail";
/// Liveness route used by clients when they connect.
pub const HEALTH_PATH: &str = "/rpc/health";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserRequest {
    pub id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserByEmailRequest {
    pub email: String,
}

/// Read-only view of a user as seen from another service.
///
/// Timestamps travel as RFC 3339 strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserResponse> for RemoteUser {
    fn from(user: UserResponse) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

/// Standardized status codes of the RPC surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RpcCode {
    NotFound,
    InvalidArgument,
    Internal,
}

/// Error body returned by a failed RPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcStatus {
    pub code: RpcCode,
    pub message: String,
}
