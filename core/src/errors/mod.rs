//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::{DomainError, StorageError, TokenError, ValidationError};
