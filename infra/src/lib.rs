//! # Infrastructure Layer
//!
//! Concrete adapters for the Tessera core: the MySQL connection pool, the
//! schema applied at startup and the MySQL-backed credential store.
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Schema migration error
    #[error("Migration of '{entity}' failed: {source}")]
    Migration {
        entity: &'static str,
        #[source]
        source: sqlx::Error,
    },
}
