//! Settings from env vars, each with a local-development default.

use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/crm_poc";
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_MONGODB_DATABASE: &str = "crm_poc";
pub const DEFAULT_AUTH_TOKEN: &str = "my-static-token";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub auth_token: String,
    pub bind_addr: SocketAddr,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (used by tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid {
                    key: "DB_MAX_CONNECTIONS",
                    value: raw,
                })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let bind_raw = get("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind_raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;
        Ok(Settings {
            database_url: get("DATABASE_URL", DEFAULT_DATABASE_URL),
            max_connections,
            mongodb_uri: get("MONGODB_URI", DEFAULT_MONGODB_URI),
            mongodb_database: get("MONGODB_DATABASE", DEFAULT_MONGODB_DATABASE),
            auth_token: get("AUTH_TOKEN", DEFAULT_AUTH_TOKEN),
            bind_addr,
        })
    }
}
