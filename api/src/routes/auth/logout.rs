use actix_web::{web, HttpResponse};

use ts_core::repositories::CredentialStore;
use ts_core::services::token::Clock;

use crate::dto::auth::RevokeResponse;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Logs the caller out everywhere by revoking all of their refresh tokens.
/// Access tokens already issued stay valid until they expire.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "revoked": 2
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing or invalid access token
/// - 503 Service Unavailable: Credential store unreachable
pub async fn logout<S, C>(state: web::Data<AppState<S, C>>, auth: AuthContext) -> HttpResponse
where
    S: CredentialStore + 'static,
    C: Clock + 'static,
{
    match state.token_service.revoke_all(&auth.identity).await {
        Ok(revoked) => HttpResponse::Ok().json(RevokeResponse { revoked }),
        Err(error) => handle_domain_error(&error.into()),
    }
}
