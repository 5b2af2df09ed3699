//! Application factory
//!
//! Builds the actix-web application around a shared [`AppState`].

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, Error,
};

use ts_core::repositories::CredentialStore;
use ts_core::services::token::Clock;

use crate::handlers::error::{json_error_handler, not_found};
use crate::middleware::auth::{AccessTokenValidator, JwtAuth};
use crate::routes::auth::{logout::logout, refresh::refresh, revoke::revoke, sessions::sessions};
use crate::routes::health::health_check;
use crate::state::AppState;

/// Create and configure the application with all dependencies
pub fn create_app<S, C>(
    app_state: web::Data<AppState<S, C>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    S: CredentialStore + 'static,
    C: Clock + 'static,
{
    let validator: Arc<dyn AccessTokenValidator> = app_state.token_service.clone();
    let auth = JwtAuth::new(validator);

    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Logger::default())
        // Health check endpoint
        .route("/health", web::get().to(health_check::<S, C>))
        // API v1 routes
        .service(
            web::scope("/api/v1/auth")
                .route("/refresh", web::post().to(refresh::<S, C>))
                .route("/revoke", web::post().to(revoke::<S, C>))
                .service(
                    web::resource("/logout")
                        .wrap(auth.clone())
                        .route(web::post().to(logout::<S, C>)),
                )
                .service(
                    web::resource("/sessions")
                        .wrap(auth)
                        .route(web::get().to(sessions::<S, C>)),
                ),
        )
        .default_service(web::route().to(not_found))
}
