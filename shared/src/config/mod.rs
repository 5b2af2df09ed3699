//! Configuration module with business-specific sub-modules
//!
//! - `auth` - Signing secret and token lifetimes
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server configuration

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub use auth::{AuthConfig, JwtConfig};
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Errors raised while loading configuration at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}")]
    Missing { key: &'static str },

    #[error("Invalid configuration for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Callers are expected to have loaded any `.env` file beforehand.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        Ok(Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            logging: LoggingConfig::from_env(environment),
        })
    }
}

/// Read and parse an environment variable, falling back to `default`
/// when it is unset or unparseable.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_on_missing_key() {
        let value: u16 = env_or("TS_SHARED_TEST_SURELY_UNSET_KEY", 4242);
        assert_eq!(value, 4242);
    }

    #[test]
    fn test_config_error_messages() {
        let missing = ConfigError::Missing { key: "JWT_SECRET" };
        assert_eq!(missing.to_string(), "Missing required configuration: JWT_SECRET");

        let invalid = ConfigError::Invalid {
            key: "JWT_SECRET",
            reason: "must not be empty".to_string(),
        };
        assert!(invalid.to_string().contains("must not be empty"));
    }
}
