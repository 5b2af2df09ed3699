//! Bearer authentication middleware for protecting API endpoints.
//!
//! Extracts the access token from the Authorization header, validates it
//! through the token service and injects the caller's identity into the
//! request.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::{header::AUTHORIZATION, StatusCode},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use ts_core::{
    domain::entities::Identity,
    errors::TokenError,
    repositories::CredentialStore,
    services::token::{Clock, TokenService},
};
use ts_shared::errors::error_codes;

use crate::dto::{ErrorResponse, ErrorResponseExt};
use crate::handlers::error::handle_token_error;

/// Authentication context injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Identity the access token was issued to
    pub identity: Identity,
}

/// Validates access tokens; lets the middleware stay independent of the
/// store and clock types behind the token service
pub trait AccessTokenValidator: Send + Sync {
    fn validate_access_token(&self, token: &str) -> Result<Identity, TokenError>;
}

impl<S: CredentialStore, C: Clock> AccessTokenValidator for TokenService<S, C> {
    fn validate_access_token(&self, token: &str) -> Result<Identity, TokenError> {
        TokenService::validate_access_token(self, token)
    }
}

/// Bearer authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    validator: Arc<dyn AccessTokenValidator>,
}

impl JwtAuth {
    pub fn new(validator: Arc<dyn AccessTokenValidator>) -> Self {
        Self { validator }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            validator: Arc::clone(&self.validator),
        }))
    }
}

/// Bearer authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    validator: Arc<dyn AccessTokenValidator>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let validator = Arc::clone(&self.validator);

        Box::pin(async move {
            let Some(token) = extract_bearer_token(&req) else {
                let response = ErrorResponse::new(error_codes::UNAUTHORIZED, "Missing or invalid Authorization header")
                    .to_response(StatusCode::UNAUTHORIZED);
                return Ok(req.into_response(response).map_into_right_body());
            };

            match validator.validate_access_token(&token) {
                Ok(identity) => {
                    req.extensions_mut().insert(AuthContext { identity });
                    let response = service.call(req).await?;
                    Ok(response.map_into_left_body())
                }
                Err(error) => {
                    let response = handle_token_error(&error);
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}
