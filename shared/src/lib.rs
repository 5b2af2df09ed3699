//! Shared configuration and common types for the Tessera server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error response structures and error codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, ConfigError, DatabaseConfig, Environment, JwtConfig, LoggingConfig,
    ServerConfig,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
