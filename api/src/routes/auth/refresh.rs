use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use ts_core::repositories::CredentialStore;
use ts_core::services::token::Clock;

use crate::dto::auth::{RefreshTokenRequest, TokenPairResponse};
use crate::handlers::error::{handle_domain_error, validation_failure};
use crate::state::AppState;

use super::client_context;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new token pair. The presented refresh
/// token is spent; replaying it later revokes every session of the user.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "string"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "token_type": "Bearer",
///     "expires_in": 900,
///     "access_token_expires_at": "2024-03-01T09:15:00Z",
///     "refresh_token": "new_refresh_token_string",
///     "refresh_token_expires_at": "2024-03-03T21:00:00Z"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing or oversized refresh token
/// - 401 Unauthorized: Unknown, expired, revoked or reused refresh token
/// - 503 Service Unavailable: Credential store unreachable; retry later
pub async fn refresh<S, C>(
    req: HttpRequest,
    state: web::Data<AppState<S, C>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    S: CredentialStore + 'static,
    C: Clock + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_domain_error(&validation_failure(&errors));
    }

    let client = client_context(&req);
    match state
        .token_service
        .rotate_refresh_token(&request.refresh_token, &client)
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(TokenPairResponse::new(pair, state.token_service.now())),
        Err(error) => handle_domain_error(&error.into()),
    }
}
