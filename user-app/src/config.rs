//! Configuration loading from environment.

use std::env;

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub rpc_port: u16,
    pub database_url: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = var("PORT").unwrap_or_else(|| "8080".to_string()).parse()?;
        let rpc_port = var("RPC_PORT")
            .unwrap_or_else(|| "9091".to_string())
            .parse()?;

        let database_url = var("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        Ok(Self {
            port,
            rpc_port,
            database_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "memory://")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rpc_port, 9091);
    }

    #[test]
    fn test_database_url_required() {
        assert!(load(&[]).is_err());
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(load(&[("DATABASE_URL", "memory://"), ("RPC_PORT", "nope")]).is_err());
    }
}
