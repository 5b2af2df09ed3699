//! Error kinds for the session-credential subsystem.
//!
//! Messages never include token material or the signing secret.

use thiserror::Error;
use ts_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

/// Failures raised by the credential store
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Record not found")]
    NotFound,

    /// Two credentials hashed to the same value; the store is in a corrupted state
    #[error("Duplicate refresh token hash")]
    DuplicateHash,

    #[error("Credential store unavailable: {0}")]
    Unavailable(String),

    #[error("Credential store query failed: {0}")]
    Query(String),

    #[error("Corrupted credential record: {0}")]
    Corrupted(String),
}

/// Token issuance and validation errors
#[derive(Error, Debug)]
pub enum TokenError {
    /// Misconfiguration or encoding failure; detectable at startup
    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token not yet valid")]
    NotYetValid,

    #[error("Malformed token")]
    Malformed,

    /// Refresh token absent, expired, revoked or reused
    #[error("Invalid refresh credential")]
    InvalidCredential,

    /// Credential store failure; transient, the caller may retry
    #[error("Credential persistence failed: {0}")]
    Persistence(#[from] StorageError),
}

impl TokenError {
    /// Stable error code for API clients
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::Expired => error_codes::TOKEN_EXPIRED,
            TokenError::InvalidSignature | TokenError::NotYetValid | TokenError::Malformed => {
                error_codes::TOKEN_INVALID
            }
            TokenError::InvalidCredential => error_codes::CREDENTIAL_INVALID,
            TokenError::Persistence(_) => error_codes::SERVICE_UNAVAILABLE,
            TokenError::Signing(_) => error_codes::INTERNAL_ERROR,
        }
    }

    /// Whether retrying the same request later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, TokenError::Persistence(_))
    }

    /// Whether the client must present credentials again (refresh or full login)
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            TokenError::InvalidSignature
                | TokenError::Expired
                | TokenError::NotYetValid
                | TokenError::Malformed
                | TokenError::InvalidCredential
        )
    }

    /// Client-facing message. Store and signing details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            TokenError::Expired => "Access token expired, please refresh",
            TokenError::InvalidSignature | TokenError::NotYetValid | TokenError::Malformed => {
                "Invalid access token, please refresh or log in again"
            }
            TokenError::InvalidCredential => "Invalid refresh token, please log in again",
            TokenError::Persistence(_) => "Service temporarily unavailable, please retry",
            TokenError::Signing(_) => "An internal error occurred",
        }
    }
}

impl IntoErrorResponse for TokenError {
    fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.code(), self.public_message())
            .add_detail("retryable", self.is_retryable())
    }
}

/// Validation errors for domain values
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },
}

/// Top-level error for adapters that combine token, storage and input failures
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            DomainError::Token(err) => err.to_error_response(),
            DomainError::Storage(_) => {
                ErrorResponse::new(error_codes::SERVICE_UNAVAILABLE, "Service temporarily unavailable, please retry")
                    .add_detail("retryable", true)
            }
            DomainError::Validation(err) => ErrorResponse::new(error_codes::VALIDATION_ERROR, err.to_string()),
        }
    }
}
