//! Unit tests for error kinds

use ts_shared::errors::IntoErrorResponse;

use crate::errors::{StorageError, TokenError};

#[test]
fn test_access_token_errors_are_distinct_codes() {
    assert_eq!(TokenError::Expired.code(), "TOKEN_EXPIRED");
    assert_eq!(TokenError::InvalidSignature.code(), "TOKEN_INVALID");
    assert_eq!(TokenError::Malformed.code(), "TOKEN_INVALID");
    assert_eq!(TokenError::InvalidCredential.code(), "CREDENTIAL_INVALID");
}

#[test]
fn test_only_persistence_is_retryable() {
    let persistence = TokenError::from(StorageError::Unavailable("pool timed out".to_string()));
    assert!(persistence.is_retryable());
    assert!(!persistence.is_authentication_failure());

    for error in [
        TokenError::InvalidSignature,
        TokenError::Expired,
        TokenError::Malformed,
        TokenError::InvalidCredential,
    ] {
        assert!(!error.is_retryable());
        assert!(error.is_authentication_failure());
    }
    assert!(!TokenError::Signing("empty secret".to_string()).is_authentication_failure());
}

#[test]
fn test_error_response_hides_store_details() {
    let error = TokenError::Persistence(StorageError::Query("deadlock on refresh_credentials".to_string()));
    let response = error.to_error_response();

    assert_eq!(response.error, "SERVICE_UNAVAILABLE");
    assert!(!response.message.contains("deadlock"));
    assert_eq!(response.details.unwrap()["retryable"], true);
}

#[test]
fn test_persistence_display_includes_source() {
    let error = TokenError::from(StorageError::DuplicateHash);
    assert_eq!(error.to_string(), "Credential persistence failed: Duplicate refresh token hash");
}

#[test]
fn test_domain_error_wraps_without_leaking_details() {
    use crate::errors::{DomainError, ValidationError};

    let storage = DomainError::from(StorageError::Query("deadlock on refresh_credentials".to_string()));
    let response = storage.to_error_response();
    assert_eq!(response.error, "SERVICE_UNAVAILABLE");
    assert!(!response.message.contains("deadlock"));

    let validation = DomainError::from(ValidationError::RequiredField {
        field: "identity".to_string(),
    });
    assert_eq!(validation.to_error_response().error, "VALIDATION_ERROR");

    let token = DomainError::from(TokenError::Expired);
    assert_eq!(token.to_error_response().error, "TOKEN_EXPIRED");
}
