//! One-time tokens for email verification and password reset.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One-time token bound to an identifier (an email address or a user id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationToken {
    pub id: Uuid,
    /// Email address or user id the token was issued for
    pub identifier: String,
    /// Unguessable token value (unique)
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl VerificationToken {
    pub fn new(identifier: impl Into<String>, token: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            identifier: identifier.into(),
            token: token.into(),
            expires_at: now + ttl,
            created_at: now,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
