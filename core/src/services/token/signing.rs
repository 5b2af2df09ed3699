//! HS256 signing and verification of access tokens

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;

use crate::domain::entities::token::AccessClaims;
use crate::errors::TokenError;

/// Signs and verifies access tokens with a single symmetric key.
///
/// Time checks run against the `now` handed in by the caller, so the
/// engine has no side effects and never reads the wall clock.
#[derive(Clone)]
pub struct SigningEngine {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    leeway_seconds: i64,
}

impl SigningEngine {
    /// Creates an engine for `issuer`
    ///
    /// # Arguments
    ///
    /// * `secret` - HMAC key; must not be empty
    /// * `issuer` - Value written to and required in `iss`
    /// * `leeway_seconds` - Allowed clock skew for `exp` and `nbf`
    pub fn new(secret: &str, issuer: &str, leeway_seconds: u64) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Signing("signing secret is empty".to_string()));
        }
        let leeway_seconds = i64::try_from(leeway_seconds)
            .map_err(|_| TokenError::Signing("clock skew out of range".to_string()))?;

        // exp/nbf are checked in `verify` against the injected time
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "nbf", "sub", "iss"]);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            leeway_seconds,
        })
    }

    /// Encodes and signs the claims into a compact JWS
    pub fn sign(&self, claims: &AccessClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies signature and issuer, then the validity window at `now`
    ///
    /// # Returns
    ///
    /// * `Ok(AccessClaims)` - The token is authentic and currently valid
    /// * `Err(TokenError::InvalidSignature)` - Bad MAC or foreign issuer
    /// * `Err(TokenError::Expired)` - `now` is at or past `exp` plus leeway
    /// * `Err(TokenError::NotYetValid)` - `now` is before `nbf` minus leeway
    /// * `Err(TokenError::Malformed)` - Anything structurally wrong
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenError> {
        let claims = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidIssuer => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })?
            .claims;

        if claims.is_expired_at(now, self.leeway_seconds) {
            return Err(TokenError::Expired);
        }
        if claims.is_premature_at(now, self.leeway_seconds) {
            return Err(TokenError::NotYetValid);
        }
        Ok(claims)
    }
}

impl fmt::Debug for SigningEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningEngine")
            .field("algorithm", &Algorithm::HS256)
            .field("issuer", &self.validation.iss)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish_non_exhaustive()
    }
}
