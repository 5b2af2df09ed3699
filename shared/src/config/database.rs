//! Database configuration module

use serde::{Deserialize, Serialize};

use super::{env_or, ConfigError};

/// Database configuration for MySQL connections
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout: u64,

    /// Maximum lifetime of a connection in seconds
    pub max_lifetime: u64,

    /// Slow query threshold in milliseconds
    #[serde(default = "default_slow_query_threshold")]
    pub slow_query_threshold: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::from("mysql://localhost:3306/tessera"),
            max_connections: 10,
            connect_timeout: 30,
            idle_timeout: 600,
            max_lifetime: 1800,
            slow_query_threshold: default_slow_query_threshold(),
        }
    }
}

impl DatabaseConfig {
    /// Create from environment variables
    ///
    /// `DATABASE_URL` is required; pool sizing falls back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::Missing { key: "DATABASE_URL" })?;
        if url.is_empty() {
            return Err(ConfigError::Invalid {
                key: "DATABASE_URL",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            connect_timeout: env_or("DATABASE_CONNECT_TIMEOUT", 30),
            ..Default::default()
        })
    }

    /// Create a new database configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the maximum number of connections
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the connect timeout in seconds
    pub fn with_connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout = seconds;
        self
    }
}

fn default_slow_query_threshold() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_builder() {
        let config = DatabaseConfig::new("mysql://db:3306/tessera")
            .with_max_connections(25)
            .with_connect_timeout(5);

        assert_eq!(config.url, "mysql://db:3306/tessera");
        assert_eq!(config.max_connections, 25);
        assert_eq!(config.connect_timeout, 5);
        assert_eq!(config.idle_timeout, 600);
        assert_eq!(config.slow_query_threshold, 1000);
    }
}
