//! # User Client
//!
//! Remote User Lookup Client: the only way a dependent service (payments)
//! learns about users. Talks to the user service's RPC listener.
//!
//! One client is built at startup and shared by every request. It is a thin
//! pass-through: no caching, no retry, no timeout of its own and no circuit
//! breaker. A slow user service stalls the caller for as long as it is slow.

use async_trait::async_trait;
use platform_types::{
    LookupError, RemoteUser, RpcCode, RpcStatus, UserId, UserLookup,
    rpc::{GET_USER_BY_EMAIL_PATH, GET_USER_PATH, GetUserByEmailRequest, GetUserRequest, HEALTH_PATH},
};
use reqwest::Client;
use serde::Serialize;

/// Client for the user service RPC surface.
///
/// Cloning is cheap and clones share the same connection pool.
#[derive(Clone)]
pub struct RemoteUserClient {
    base_url: String,
    http: Client,
}

impl RemoteUserClient {
    /// Creates a client without touching the network.
    ///
    /// Accepts `http://host:port` or a bare `host:port` (plaintext transport).
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            base_url: normalize_addr(addr.into()),
            http: Client::new(),
        }
    }

    /// Creates a client and checks once that the user service answers.
    ///
    /// There is no retry: callers are expected to treat an error as fatal.
    pub async fn connect(addr: impl Into<String>) -> anyhow::Result<Self> {
        let client = Self::new(addr);
        client.probe().await.map_err(|e| {
            anyhow::anyhow!("Failed to connect to user service at {}: {}", client.base_url, e)
        })?;
        tracing::info!("Connected to user service at {}", client.base_url);
        Ok(client)
    }

    /// Returns the normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn probe(&self) -> Result<(), LookupError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, HEALTH_PATH))
            .send()
            .await
            .map_err(transport_error)?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(LookupError::Unavailable(format!(
                "health check returned {}",
                resp.status()
            )))
        }
    }

    async fn call<B: Serialize>(&self, path: &str, body: &B) -> Result<RemoteUser, LookupError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<RemoteUser>()
                .await
                .map_err(|e| LookupError::Decode(e.to_string()));
        }

        let text = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<RpcStatus>(&text) {
            Ok(RpcStatus {
                code: RpcCode::NotFound,
                message,
            }) => Err(LookupError::NotFound(message)),
            Ok(RpcStatus { code, message }) => Err(LookupError::Remote { code, message }),
            Err(_) => Err(LookupError::Remote {
                code: RpcCode::Internal,
                message: format!("HTTP {}: {}", status.as_u16(), text),
            }),
        }
    }
}

#[async_trait]
impl UserLookup for RemoteUserClient {
    async fn lookup_by_id(&self, id: UserId) -> Result<RemoteUser, LookupError> {
        self.call(GET_USER_PATH, &GetUserRequest { id }).await
    }

    async fn lookup_by_email(&self, email: &str) -> Result<RemoteUser, LookupError> {
        self.call(
            GET_USER_BY_EMAIL_PATH,
            &GetUserByEmailRequest {
                email: email.to_string(),
            },
        )
        .await
    }
}

fn transport_error(e: reqwest::Error) -> LookupError {
    LookupError::Unavailable(e.to_string())
}

fn normalize_addr(addr: String) -> String {
    let addr = addr.trim_end_matches('/');
    if addr.starts_with("http://") || addr.starts_with("https://") {
        addr.to_string()
    } else {
        format!("http://{}", addr)
    }
}
