//! Session credential entities: signed access claims, persisted refresh
//! credentials and the token pair handed to clients.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use uuid::Uuid;

use super::identity::Identity;
use crate::errors::ValidationError;

/// Claims carried by a signed access token. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (identity)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,
}

impl AccessClaims {
    /// Creates claims for an access token issued at `issued_at`
    ///
    /// # Arguments
    ///
    /// * `identity` - The principal the token is issued to
    /// * `issued_at` - Issuance time; also used as `nbf`
    /// * `ttl` - Lifetime of the token
    /// * `issuer` - Issuer label
    pub fn new(identity: &Identity, issued_at: DateTime<Utc>, ttl: Duration, issuer: &str) -> Self {
        let expires_at = expires_after(issued_at, ttl);
        Self {
            sub: identity.to_string(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.to_string(),
        }
    }

    /// Parses the subject back into an identity
    pub fn identity(&self) -> Result<Identity, ValidationError> {
        Identity::new(self.sub.clone())
    }

    /// Expiry as a timestamp, if representable
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// `true` once `now` has reached `exp` (plus the allowed skew)
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway_seconds: i64) -> bool {
        now.timestamp() >= self.exp.saturating_add(leeway_seconds)
    }

    /// `true` while `now` is still before `nbf` (minus the allowed skew)
    pub fn is_premature_at(&self, now: DateTime<Utc>, leeway_seconds: i64) -> bool {
        now.timestamp().saturating_add(leeway_seconds) < self.nbf
    }
}

/// `issued_at + ttl`, saturating at the latest representable instant
fn expires_after(issued_at: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    issued_at
        .checked_add_signed(ttl)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Read-time state of a refresh credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialState {
    /// Not revoked and not yet expired
    Active,
    /// Redeemed, logged out or revoked by reuse detection
    Revoked,
    /// Past its absolute expiry
    Expired,
}

/// Audit information captured when a credential is minted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContext {
    /// Originating IP address
    pub ip_address: Option<String>,
    /// Client user agent string
    pub user_agent: Option<String>,
}

/// Longest stored client address (textual IPv6)
pub const MAX_IP_ADDRESS_CHARS: usize = 45;

/// Longest stored user agent
pub const MAX_USER_AGENT_CHARS: usize = 512;

impl ClientContext {
    /// Builds a context from client-supplied values.
    ///
    /// The address loses any port, and both fields are cut to the lengths
    /// the credential store accepts. Blank values become `None`.
    pub fn new(ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            ip_address: ip_address.as_deref().and_then(normalize_ip),
            user_agent: user_agent
                .as_deref()
                .and_then(|agent| truncate_chars(agent, MAX_USER_AGENT_CHARS)),
        }
    }
}

fn normalize_ip(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(addr) = raw.parse::<SocketAddr>() {
        return Some(addr.ip().to_string());
    }
    let bare = raw
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(raw);
    if let Ok(ip) = bare.parse::<IpAddr>() {
        return Some(ip.to_string());
    }
    truncate_chars(raw, MAX_IP_ADDRESS_CHARS)
}

/// Keeps at most `max_chars` characters, cutting on a char boundary
fn truncate_chars(value: &str, max_chars: usize) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let end = value
        .char_indices()
        .nth(max_chars)
        .map_or(value.len(), |(index, _)| index);
    Some(value[..end].to_string())
}

/// Refresh credential stored in the database.
///
/// Only the digest of the opaque refresh token is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshCredential {
    /// Unique identifier for the credential
    pub id: Uuid,

    /// Identity this credential belongs to
    pub identity: Identity,

    /// SHA-256 digest of the opaque refresh token
    pub token_hash: String,

    /// Timestamp when the credential was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last mutation
    pub updated_at: DateTime<Utc>,

    /// Absolute expiry
    pub expires_at: DateTime<Utc>,

    /// Set once the credential is revoked; never cleared
    pub revoked_at: Option<DateTime<Utc>>,

    /// Originating IP address (audit only)
    pub created_from_ip: Option<String>,

    /// Client user agent (audit only)
    pub user_agent: Option<String>,
}

impl RefreshCredential {
    /// Creates a new, active refresh credential
    ///
    /// # Arguments
    ///
    /// * `identity` - Owner of the credential
    /// * `token_hash` - Digest of the opaque refresh token
    /// * `issued_at` - Creation time
    /// * `ttl` - Lifetime of the credential
    pub fn new(identity: Identity, token_hash: String, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity,
            token_hash,
            created_at: issued_at,
            updated_at: issued_at,
            expires_at: expires_after(issued_at, ttl),
            revoked_at: None,
            created_from_ip: None,
            user_agent: None,
        }
    }

    /// Attaches audit fields from the client context, bounded to the stored lengths
    pub fn with_client(mut self, client: &ClientContext) -> Self {
        let client = ClientContext::new(client.ip_address.clone(), client.user_agent.clone());
        self.created_from_ip = client.ip_address;
        self.user_agent = client.user_agent;
        self
    }

    /// Whether the credential has been revoked
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Whether the credential is past its expiry at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// A credential is usable iff it is not revoked and `now < expires_at`
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && !self.is_expired_at(now)
    }

    /// Computes the credential state at `now`. Revocation wins over expiry.
    pub fn state_at(&self, now: DateTime<Utc>) -> CredentialState {
        if self.is_revoked() {
            CredentialState::Revoked
        } else if self.is_expired_at(now) {
            CredentialState::Expired
        } else {
            CredentialState::Active
        }
    }

    /// Marks the credential revoked at `at`.
    ///
    /// Returns `false` without touching anything if it was already revoked.
    pub fn revoke(&mut self, at: DateTime<Utc>) -> bool {
        if self.revoked_at.is_some() {
            return false;
        }
        self.revoked_at = Some(at);
        self.updated_at = at;
        true
    }
}

/// Token pair returned to the client
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Access token expiry
    pub access_token_expires_at: DateTime<Utc>,

    /// Opaque refresh token; the only copy of the plaintext
    pub refresh_token: String,

    /// Refresh token expiry
    pub refresh_token_expires_at: DateTime<Utc>,
}

impl TokenPair {
    /// Seconds until the access token expires, measured from `now`
    pub fn access_expires_in(&self, now: DateTime<Utc>) -> i64 {
        (self.access_token_expires_at - now).num_seconds().max(0)
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("access_token_expires_at", &self.access_token_expires_at)
            .field("refresh_token", &"<redacted>")
            .field("refresh_token_expires_at", &self.refresh_token_expires_at)
            .finish()
    }
}
