//! Remote user lookup port.
//!
//! The payment service learns about users only through this trait. The
//! production adapter is an RPC client talking to the user service; tests use
//! in-process fakes.

use std::sync::Arc;

use crate::domain::UserId;
use crate::rpc::{RemoteUser, RpcCode};

/// Outcome of a failed remote lookup.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("User service unavailable: {0}")]
    Unavailable(String),

    #[error("User service returned {code:?}: {message}")]
    Remote { code: RpcCode, message: String },

    #[error("Malformed user service response: {0}")]
    Decode(String),
}

/// Port trait for looking up users owned by another service.
///
/// Calls are plain round trips: no caching, no retry, no timeout beyond
/// whatever the caller wraps around the returned future.
#[async_trait::async_trait]
pub trait UserLookup: Send + Sync + 'static {
    async fn lookup_by_id(&self, id: UserId) -> Result<RemoteUser, LookupError>;

    async fn lookup_by_email(&self, email: &str) -> Result<RemoteUser, LookupError>;
}

#[async_trait::async_trait]
impl<T: UserLookup + ?Sized> UserLookup for Arc<T> {
    async fn lookup_by_id(&self, id: UserId) -> Result<RemoteUser, LookupError> {
        (**self).lookup_by_id(id).await
    }

    async fn lookup_by_email(&self, email: &str) -> Result<RemoteUser, LookupError> {
        (**self).lookup_by_email(email).await
    }
}
