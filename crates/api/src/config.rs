//! Process configuration, read once from the environment at start-up.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const BIND_ADDR_ENV: &str = "FOODGRAM_BIND_ADDR";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const USE_PERSISTENT_STORES_ENV: &str = "USE_PERSISTENT_STORES";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const SEED_PATH_ENV: &str = "FOODGRAM_SEED_PATH";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has an invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must be set when {USE_PERSISTENT_STORES_ENV} is enabled")]
    Missing(&'static str),
}

/// Runtime configuration for the API binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// `Some` exactly when the Postgres stores are enabled.
    pub database_url: Option<String>,
    /// JSON file of users, ingredients and tags applied at start-up.
    pub seed_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            var: BIND_ADDR_ENV,
            value: raw_addr.clone(),
            reason: e.to_string(),
        })?;

        let jwt_secret = match lookup(JWT_SECRET_ENV).filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            }
        };

        let persistent = match lookup(USE_PERSISTENT_STORES_ENV) {
            None => false,
            Some(raw) => parse_flag(&raw).ok_or_else(|| ConfigError::Invalid {
                var: USE_PERSISTENT_STORES_ENV,
                value: raw.clone(),
                reason: "expected true/false/1/0".to_string(),
            })?,
        };

        let database_url = if persistent {
            Some(
                lookup(DATABASE_URL_ENV)
                    .filter(|s| !s.is_empty())
                    .ok_or(ConfigError::Missing(DATABASE_URL_ENV))?,
            )
        } else {
            None
        };

        let seed_path = lookup(SEED_PATH_ENV).filter(|s| !s.is_empty()).map(PathBuf::from);

        Ok(Self {
            bind_addr,
            jwt_secret,
            database_url,
            seed_path,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
