use actix_web::{web, HttpResponse};

use ts_core::repositories::CredentialStore;
use ts_core::services::token::Clock;

use crate::dto::auth::{SessionSummary, SessionsResponse};
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

/// Handler for GET /api/v1/auth/sessions
///
/// Lists the caller's active sessions, newest first.
pub async fn sessions<S, C>(state: web::Data<AppState<S, C>>, auth: AuthContext) -> HttpResponse
where
    S: CredentialStore + 'static,
    C: Clock + 'static,
{
    match state.token_service.active_sessions(&auth.identity).await {
        Ok(credentials) => HttpResponse::Ok().json(SessionsResponse {
            sessions: credentials.iter().map(SessionSummary::from).collect(),
        }),
        Err(error) => handle_domain_error(&error.into()),
    }
}
