//! Main token service implementation

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};

use crate::domain::entities::identity::Identity;
use crate::domain::entities::token::{
    AccessClaims, ClientContext, CredentialState, RefreshCredential, TokenPair,
};
use crate::errors::{StorageError, TokenError};
use crate::repositories::CredentialStore;

use super::clock::{Clock, SystemClock};
use super::config::TokenServiceConfig;
use super::signing::SigningEngine;

/// Length of the random refresh secret before encoding (256 bits)
const REFRESH_SECRET_BYTES: usize = 32;

/// Issues, validates, rotates and revokes session credentials.
///
/// Holds only immutable state plus a store handle, so one instance can be
/// shared across request handlers behind an `Arc`.
pub struct TokenService<S: CredentialStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    config: TokenServiceConfig,
    signer: SigningEngine,
}

impl<S: CredentialStore> TokenService<S> {
    /// Creates a new token service using the wall clock
    ///
    /// # Arguments
    ///
    /// * `store` - Credential store for persistence
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or `TokenError::Signing` if the secret is unusable
    pub fn new(store: S, config: TokenServiceConfig) -> Result<Self, TokenError> {
        Self::with_clock(store, config, SystemClock)
    }
}

impl<S: CredentialStore, C: Clock> TokenService<S, C> {
    /// Creates a new token service reading time from `clock`
    pub fn with_clock(store: S, config: TokenServiceConfig, clock: C) -> Result<Self, TokenError> {
        let signer = SigningEngine::new(&config.jwt_secret, &config.issuer, config.leeway_seconds)?;
        Ok(Self {
            store,
            clock,
            config,
            signer,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Current time as seen by the service
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Issues a fresh access/refresh pair for an authenticated identity
    ///
    /// # Arguments
    ///
    /// * `identity` - The principal the pair is issued to
    /// * `client` - Audit information stored with the refresh credential
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The refresh credential has been persisted
    /// * `Err(TokenError::Persistence)` - Nothing was stored and nothing is returned
    pub async fn issue_tokens(&self, identity: &Identity, client: &ClientContext) -> Result<TokenPair, TokenError> {
        let now = self.clock.now();
        let (pair, credential) = self.mint_pair(identity, client, now)?;
        let credential_id = credential.id;

        self.store.save(credential).await.map_err(|e| {
            error!(identity = %identity, error = %e, "Failed to persist refresh credential");
            TokenError::from(e)
        })?;

        info!(identity = %identity, credential_id = %credential_id, "Issued session tokens");
        Ok(pair)
    }

    /// Verifies an access token and returns the identity it was issued to.
    ///
    /// Never touches the store.
    pub fn validate_access_token(&self, token: &str) -> Result<Identity, TokenError> {
        let claims = self.signer.verify(token, self.clock.now())?;
        claims.identity().map_err(|_| TokenError::Malformed)
    }

    /// Exchanges a refresh token for a new pair; the presented token is spent.
    ///
    /// Presenting an already revoked token is treated as reuse of a leaked
    /// credential: every session of the identity is revoked.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The successor pair
    /// * `Err(TokenError::InvalidCredential)` - Unknown, revoked, expired, or lost a concurrent rotation
    /// * `Err(TokenError::Persistence)` - Store failure; safe to retry
    pub async fn rotate_refresh_token(&self, token: &str, client: &ClientContext) -> Result<TokenPair, TokenError> {
        let now = self.clock.now();
        let current = self
            .find_credential(token)
            .await?
            .ok_or(TokenError::InvalidCredential)?;

        match current.state_at(now) {
            CredentialState::Active => {}
            CredentialState::Revoked => {
                warn!(
                    identity = %current.identity,
                    credential_id = %current.id,
                    "Revoked refresh token presented, revoking all sessions"
                );
                self.respond_to_reuse(&current.identity, now).await;
                return Err(TokenError::InvalidCredential);
            }
            CredentialState::Expired => {
                debug!(credential_id = %current.id, "Expired refresh token presented");
                return Err(TokenError::InvalidCredential);
            }
        }

        let (pair, successor) = self.mint_pair(&current.identity, client, now)?;
        let successor_id = successor.id;

        match self.store.rotate(current.id, successor, now).await {
            Ok(true) => {}
            Ok(false) | Err(StorageError::NotFound) => {
                warn!(credential_id = %current.id, "Refresh token rotation lost to a concurrent request");
                return Err(TokenError::InvalidCredential);
            }
            Err(e) => {
                error!(credential_id = %current.id, error = %e, "Failed to rotate refresh credential");
                return Err(e.into());
            }
        }

        info!(
            identity = %current.identity,
            credential_id = %current.id,
            successor_id = %successor_id,
            "Rotated refresh token"
        );
        Ok(pair)
    }

    /// Revokes every active refresh credential of `identity`
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Number of credentials newly revoked
    pub async fn revoke_all(&self, identity: &Identity) -> Result<u64, TokenError> {
        let revoked = self
            .store
            .revoke_all_for_identity(identity, self.clock.now())
            .await
            .map_err(|e| {
                error!(identity = %identity, error = %e, "Failed to revoke sessions");
                TokenError::from(e)
            })?;

        info!(identity = %identity, revoked, "Revoked all sessions");
        Ok(revoked)
    }

    /// Revokes the single session behind a refresh token
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - This call revoked the credential
    /// * `Ok(false)` - Unknown token, or it was already revoked (possibly by a concurrent call)
    pub async fn revoke_refresh_token(&self, token: &str) -> Result<bool, TokenError> {
        let Some(credential) = self.find_credential(token).await? else {
            return Ok(false);
        };

        let revoked = match self.store.revoke(credential.id, self.clock.now()).await {
            Ok(revoked) => revoked,
            Err(StorageError::NotFound) => false,
            Err(e) => {
                error!(credential_id = %credential.id, error = %e, "Failed to revoke refresh credential");
                return Err(e.into());
            }
        };
        if revoked {
            info!(identity = %credential.identity, credential_id = %credential.id, "Revoked refresh token");
        }
        Ok(revoked)
    }

    /// Lists the identity's active sessions, newest first
    pub async fn active_sessions(&self, identity: &Identity) -> Result<Vec<RefreshCredential>, TokenError> {
        self.store
            .find_active_by_identity(identity, self.clock.now())
            .await
            .map_err(TokenError::from)
    }

    async fn find_credential(&self, token: &str) -> Result<Option<RefreshCredential>, TokenError> {
        self.store.find_by_hash(&hash_token(token)).await.map_err(|e| {
            error!(error = %e, "Failed to look up refresh credential");
            TokenError::from(e)
        })
    }

    /// Best effort: the caller is rejected either way
    async fn respond_to_reuse(&self, identity: &Identity, now: DateTime<Utc>) {
        match self.store.revoke_all_for_identity(identity, now).await {
            Ok(revoked) => warn!(identity = %identity, revoked, "Revoked sessions after refresh token reuse"),
            Err(e) => warn!(identity = %identity, error = %e, "Failed to revoke sessions after refresh token reuse"),
        }
    }

    /// Builds a signed access token and a new refresh credential at `now`
    fn mint_pair(
        &self,
        identity: &Identity,
        client: &ClientContext,
        now: DateTime<Utc>,
    ) -> Result<(TokenPair, RefreshCredential), TokenError> {
        check_lifetime(now, self.config.access_token_ttl)?;
        check_lifetime(now, self.config.refresh_token_ttl)?;

        let claims = AccessClaims::new(identity, now, self.config.access_token_ttl, &self.config.issuer);
        let access_token = self.signer.sign(&claims)?;
        // Report the expiry the token actually carries (whole seconds)
        let access_token_expires_at = claims
            .expires_at()
            .ok_or_else(|| TokenError::Signing("access token expiry out of range".to_string()))?;

        let refresh_token = generate_refresh_secret();
        let credential = RefreshCredential::new(
            identity.clone(),
            hash_token(&refresh_token),
            now,
            self.config.refresh_token_ttl,
        )
        .with_client(client);

        let pair = TokenPair {
            access_token,
            access_token_expires_at,
            refresh_token,
            refresh_token_expires_at: credential.expires_at,
        };
        Ok((pair, credential))
    }
}

/// Rejects lifetimes that push an expiry past the representable range
fn check_lifetime(now: DateTime<Utc>, ttl: Duration) -> Result<(), TokenError> {
    now.checked_add_signed(ttl)
        .map(|_| ())
        .ok_or_else(|| TokenError::Signing("token lifetime out of range".to_string()))
}

/// Generates an opaque refresh secret from the OS CSPRNG
pub(crate) fn generate_refresh_secret() -> String {
    let mut bytes = [0u8; REFRESH_SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 digest of a refresh token, hex encoded
pub(crate) fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
