//! Configuration for the token service

use chrono::Duration;
use std::fmt;
use ts_shared::config::auth::{
    DEFAULT_ACCESS_TOKEN_TTL_MINUTES, DEFAULT_ISSUER, DEFAULT_REFRESH_TOKEN_TTL_MINUTES, MAX_TTL_MINUTES,
};
use ts_shared::config::JwtConfig;

/// Configuration for the token service
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// HMAC signing secret
    pub jwt_secret: String,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh credential lifetime
    pub refresh_token_ttl: Duration,
    /// Issuer label written to and required in access tokens
    pub issuer: String,
    /// Allowed clock skew when checking `exp`/`nbf`, in seconds
    pub leeway_seconds: u64,
}

impl TokenServiceConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_token_ttl: Duration::minutes(DEFAULT_ACCESS_TOKEN_TTL_MINUTES),
            refresh_token_ttl: Duration::minutes(DEFAULT_REFRESH_TOKEN_TTL_MINUTES),
            issuer: DEFAULT_ISSUER.to_string(),
            leeway_seconds: 0,
        }
    }

    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    pub fn with_refresh_token_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_token_ttl = ttl;
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_leeway_seconds(mut self, leeway_seconds: u64) -> Self {
        self.leeway_seconds = leeway_seconds;
        self
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(jwt: &JwtConfig) -> Self {
        Self {
            jwt_secret: jwt.secret.clone(),
            access_token_ttl: Duration::minutes(jwt.access_token_ttl_minutes.min(MAX_TTL_MINUTES)),
            refresh_token_ttl: Duration::minutes(jwt.refresh_token_ttl_minutes.min(MAX_TTL_MINUTES)),
            issuer: jwt.issuer.clone(),
            leeway_seconds: jwt.clock_skew_seconds,
        }
    }
}

impl fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("issuer", &self.issuer)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}
