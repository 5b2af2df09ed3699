//! Token service module for session credentials
//!
//! This module handles all token-related operations including:
//! - Access token signing and verification
//! - Refresh token issuance, rotation and reuse detection
//! - Session revocation and listing

mod clock;
mod config;
mod service;
mod signing;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TokenServiceConfig;
pub use service::TokenService;
pub use signing::SigningEngine;
