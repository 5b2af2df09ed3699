//! # Tessera Core
//!
//! Domain layer for session credentials: entities, the credential store
//! contract, access token signing and the token lifecycle service.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
