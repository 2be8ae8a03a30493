//! Runtime configuration read from `DAYBOOK_*` environment variables.

use anyhow::{anyhow, Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;

pub const DATABASE_URL_VAR: &str = "DAYBOOK_DATABASE_URL";
pub const BIND_ADDR_VAR: &str = "DAYBOOK_BIND_ADDR";
pub const CORS_ORIGIN_VAR: &str = "DAYBOOK_CORS_ORIGIN";
pub const DEFAULT_USER_VAR: &str = "DAYBOOK_DEFAULT_USER";

const DEFAULT_DATABASE_URL: &str = "sqlite:daybook.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";
const DEFAULT_USER_ID: &str = "guest-user-id";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Frontend origin allowed by CORS
    pub cors_origin: HeaderValue,
    /// Account used when a request carries no `x-user-id`
    pub default_user_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_origin: HeaderValue::from_static(DEFAULT_CORS_ORIGIN),
            default_user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

impl AppConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source; unset or blank variables take their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str, default: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind_addr = read(BIND_ADDR_VAR, DEFAULT_BIND_ADDR);
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("{} is not a socket address: {}", BIND_ADDR_VAR, bind_addr))?;

        let cors_origin = read(CORS_ORIGIN_VAR, DEFAULT_CORS_ORIGIN);
        let cors_origin = HeaderValue::from_str(&cors_origin)
            .map_err(|_| anyhow!("{} is not a valid origin: {}", CORS_ORIGIN_VAR, cors_origin))?;

        Ok(Self {
            database_url: read(DATABASE_URL_VAR, DEFAULT_DATABASE_URL),
            bind_addr,
            cors_origin,
            default_user_id: read(DEFAULT_USER_VAR, DEFAULT_USER_ID),
        })
    }
}
