//! Configuration loading from environment.

use std::env;

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Address of the user service RPC listener.
    pub user_service_rpc: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = var("PORT").unwrap_or_else(|| "8081".to_string()).parse()?;

        let database_url = var("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let user_service_rpc =
            var("USER_SERVICE_RPC").unwrap_or_else(|| "http://localhost:9091".to_string());

        Ok(Self {
            port,
            database_url,
            user_service_rpc,
        })
    }
}
