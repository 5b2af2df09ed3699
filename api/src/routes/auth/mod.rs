//! Session route handlers
//!
//! - Token refresh (rotation)
//! - Logout from every session
//! - Single-session revocation by refresh token
//! - Listing of active sessions

pub mod logout;
pub mod refresh;
pub mod revoke;
pub mod sessions;

use actix_web::{http::header::USER_AGENT, HttpRequest};
use ts_core::domain::entities::ClientContext;

/// Audit information about the calling client
pub fn client_context(req: &HttpRequest) -> ClientContext {
    let ip_address = req.connection_info().realip_remote_addr().map(|addr| addr.to_string());
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());
    ClientContext::new(ip_address, user_agent)
}
