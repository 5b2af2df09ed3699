//! Authentication and session-credential configuration

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{env_or, ConfigError};

/// Default access token lifetime (15 minutes)
pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// Default refresh token lifetime (3600 minutes, 2.5 days)
pub const DEFAULT_REFRESH_TOKEN_TTL_MINUTES: i64 = 3600;

/// Upper bound for either token lifetime (five years)
pub const MAX_TTL_MINUTES: i64 = 5 * 365 * 24 * 60;

/// Default issuer label written into access tokens
pub const DEFAULT_ISSUER: &str = "tessera-api";

/// JWT signing and token lifetime configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Symmetric secret used to sign access tokens
    pub secret: String,

    /// Access token lifetime in minutes
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: i64,

    /// Refresh token lifetime in minutes
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_minutes: i64,

    /// Issuer claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Allowed clock skew when checking `nbf`/`exp`, in seconds
    #[serde(default)]
    pub clock_skew_seconds: u64,
}

// The secret must never reach log output.
impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("refresh_token_ttl_minutes", &self.refresh_token_ttl_minutes)
            .field("issuer", &self.issuer)
            .field("clock_skew_seconds", &self.clock_skew_seconds)
            .finish()
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret and default lifetimes
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_ttl_minutes: DEFAULT_ACCESS_TOKEN_TTL_MINUTES,
            refresh_token_ttl_minutes: DEFAULT_REFRESH_TOKEN_TTL_MINUTES,
            issuer: default_issuer(),
            clock_skew_seconds: 0,
        }
    }

    /// Create from environment variables
    ///
    /// `JWT_SECRET` is required. Unparseable TTLs fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| ConfigError::Missing { key: "JWT_SECRET" })?;

        let config = Self {
            secret,
            access_token_ttl_minutes: env_or("JWT_ACCESS_TOKEN_TTL", DEFAULT_ACCESS_TOKEN_TTL_MINUTES),
            refresh_token_ttl_minutes: env_or("JWT_REFRESH_TOKEN_TTL", DEFAULT_REFRESH_TOKEN_TTL_MINUTES),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| default_issuer()),
            clock_skew_seconds: env_or("JWT_CLOCK_SKEW_SECONDS", 0),
        };
        config.validate()?;
        Ok(config)
    }

    /// Set access token lifetime in minutes
    pub fn with_access_ttl_minutes(mut self, minutes: i64) -> Self {
        self.access_token_ttl_minutes = minutes;
        self
    }

    /// Set refresh token lifetime in minutes
    pub fn with_refresh_ttl_minutes(mut self, minutes: i64) -> Self {
        self.refresh_token_ttl_minutes = minutes;
        self
    }

    /// Set the issuer label
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Set the allowed clock skew
    pub fn with_clock_skew_seconds(mut self, seconds: u64) -> Self {
        self.clock_skew_seconds = seconds;
        self
    }

    /// Reject configurations that cannot produce valid tokens
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                reason: "must not be empty".to_string(),
            });
        }
        validate_ttl("JWT_ACCESS_TOKEN_TTL", self.access_token_ttl_minutes)?;
        validate_ttl("JWT_REFRESH_TOKEN_TTL", self.refresh_token_ttl_minutes)?;
        Ok(())
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            jwt: JwtConfig::from_env()?,
        })
    }
}

fn validate_ttl(key: &'static str, minutes: i64) -> Result<(), ConfigError> {
    if minutes <= 0 {
        return Err(ConfigError::Invalid {
            key,
            reason: "must be a positive number of minutes".to_string(),
        });
    }
    if minutes > MAX_TTL_MINUTES {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("must not exceed {} minutes", MAX_TTL_MINUTES),
        });
    }
    Ok(())
}

fn default_access_ttl() -> i64 {
    DEFAULT_ACCESS_TOKEN_TTL_MINUTES
}

fn default_refresh_ttl() -> i64 {
    DEFAULT_REFRESH_TOKEN_TTL_MINUTES
}

fn default_issuer() -> String {
    String::from(DEFAULT_ISSUER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_defaults() {
        let config = JwtConfig::new("my-secret");
        assert_eq!(config.access_token_ttl_minutes, 15);
        assert_eq!(config.refresh_token_ttl_minutes, 3600);
        assert_eq!(config.issuer, "tessera-api");
        assert_eq!(config.clock_skew_seconds, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret")
            .with_access_ttl_minutes(30)
            .with_refresh_ttl_minutes(60)
            .with_issuer("other")
            .with_clock_skew_seconds(5);

        assert_eq!(config.access_token_ttl_minutes, 30);
        assert_eq!(config.refresh_token_ttl_minutes, 60);
        assert_eq!(config.issuer, "other");
        assert_eq!(config.clock_skew_seconds, 5);
    }

    #[test]
    fn test_empty_secret_rejected() {
        let err = JwtConfig::new("").validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "JWT_SECRET", .. }));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        assert!(JwtConfig::new("s").with_access_ttl_minutes(0).validate().is_err());
        assert!(JwtConfig::new("s").with_refresh_ttl_minutes(-1).validate().is_err());
    }

    #[test]
    fn test_oversized_ttl_rejected() {
        let err = JwtConfig::new("s")
            .with_refresh_ttl_minutes(200_000_000_000)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "JWT_REFRESH_TOKEN_TTL", .. }));

        assert!(JwtConfig::new("s").with_access_ttl_minutes(MAX_TTL_MINUTES + 1).validate().is_err());
        assert!(JwtConfig::new("s").with_refresh_ttl_minutes(MAX_TTL_MINUTES).validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = JwtConfig::new("super-secret-value");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: JwtConfig = serde_json::from_str(r#"{"secret":"abc"}"#).unwrap();
        assert_eq!(config.access_token_ttl_minutes, 15);
        assert_eq!(config.refresh_token_ttl_minutes, 3600);
        assert_eq!(config.issuer, "tessera-api");
    }
}
