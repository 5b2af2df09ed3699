use actix_web::{web, HttpResponse};
use validator::Validate;

use ts_core::repositories::CredentialStore;
use ts_core::services::token::Clock;

use crate::dto::auth::{RefreshTokenRequest, RevokeResponse};
use crate::handlers::error::{handle_domain_error, validation_failure};
use crate::state::AppState;

/// Handler for POST /api/v1/auth/revoke
///
/// Ends the single session behind a refresh token. Possession of the token
/// is the authorization; unknown or already revoked tokens report
/// `revoked: 0` rather than an error.
pub async fn revoke<S, C>(state: web::Data<AppState<S, C>>, request: web::Json<RefreshTokenRequest>) -> HttpResponse
where
    S: CredentialStore + 'static,
    C: Clock + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_domain_error(&validation_failure(&errors));
    }

    match state.token_service.revoke_refresh_token(&request.refresh_token).await {
        Ok(revoked) => HttpResponse::Ok().json(RevokeResponse {
            revoked: u64::from(revoked),
        }),
        Err(error) => handle_domain_error(&error.into()),
    }
}
