//! Database module - MySQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool management
//! - The entity schema applied at startup
//! - The MySQL credential store

pub mod connection;
pub mod mysql;
pub mod schema;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::MySqlCredentialStore;
pub use schema::{EntitySchema, ENTITIES};
