use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use ts_core::domain::entities::{RefreshCredential, TokenPair};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, max = 512))]
    pub refresh_token: String,
}

/// Token pair as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
}

impl TokenPairResponse {
    pub fn new(pair: TokenPair, now: DateTime<Utc>) -> Self {
        let expires_in = pair.access_expires_in(now);
        Self {
            access_token: pair.access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            access_token_expires_at: pair.access_token_expires_at,
            refresh_token: pair.refresh_token,
            refresh_token_expires_at: pair.refresh_token_expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeResponse {
    /// Number of sessions revoked by this request
    pub revoked: u64,
}

/// One active session; never carries the token hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl From<&RefreshCredential> for SessionSummary {
    fn from(credential: &RefreshCredential) -> Self {
        Self {
            id: credential.id,
            created_at: credential.created_at,
            expires_at: credential.expires_at,
            ip_address: credential.created_from_ip.clone(),
            user_agent: credential.user_agent.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionSummary>,
}
