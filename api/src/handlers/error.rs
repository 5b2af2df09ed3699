//! Conversion of domain errors into HTTP responses

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};
use validator::ValidationErrors;

use ts_core::errors::{DomainError, TokenError, ValidationError};
use ts_shared::errors::{error_codes, IntoErrorResponse};

use crate::dto::{ErrorResponse, ErrorResponseExt};

/// HTTP status for a token error
///
/// Authentication failures are 401 so clients refresh or log in again;
/// store failures are 503 so they retry.
pub fn token_error_status(error: &TokenError) -> StatusCode {
    match error {
        TokenError::InvalidSignature
        | TokenError::Expired
        | TokenError::NotYetValid
        | TokenError::Malformed
        | TokenError::InvalidCredential => StatusCode::UNAUTHORIZED,
        TokenError::Persistence(_) => StatusCode::SERVICE_UNAVAILABLE,
        TokenError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Handle token errors and convert them to appropriate HTTP responses
pub fn handle_token_error(error: &TokenError) -> HttpResponse {
    let status = token_error_status(error);
    if status.is_server_error() {
        log::error!("Token operation failed: {}", error);
    } else {
        log::debug!("Rejected credentials: {}", error);
    }
    error.to_error_response().to_response(status)
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Token(token_error) => handle_token_error(token_error),
        DomainError::Storage(_) => {
            log::error!("Storage error: {}", error);
            error.to_error_response().to_response(StatusCode::SERVICE_UNAVAILABLE)
        }
        DomainError::Validation(_) => error.to_error_response().to_response(StatusCode::BAD_REQUEST),
    }
}

/// Collapse validator output into a domain validation error naming the first bad field
pub fn validation_failure(errors: &ValidationErrors) -> DomainError {
    let field = errors
        .field_errors()
        .keys()
        .next()
        .map(|field| field.to_string())
        .unwrap_or_else(|| "body".to_string());
    DomainError::Validation(ValidationError::InvalidFormat { field })
}

/// Error handler for unparseable JSON bodies
pub fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = ErrorResponse::new(error_codes::BAD_REQUEST, "Invalid JSON request body")
        .to_response(StatusCode::BAD_REQUEST);
    actix_web::error::InternalError::from_response(error, response).into()
}

/// Fallback for unknown routes
pub async fn not_found() -> HttpResponse {
    ErrorResponse::new(error_codes::NOT_FOUND, "The requested resource was not found")
        .to_response(StatusCode::NOT_FOUND)
}
