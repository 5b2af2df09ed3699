//! Identity reference for an authenticated principal.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::ValidationError;

/// Opaque identifier of a principal.
///
/// Owned by the account store; the session layer only carries it by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Creates an identity from any non-empty string
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "identity".to_string(),
            });
        }
        Ok(Self(value))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identity, returning the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<Uuid> for Identity {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_rejects_blank() {
        assert!(Identity::new("").is_err());
        assert!(Identity::new("   ").is_err());
    }

    #[test]
    fn test_identity_from_uuid() {
        let id = Uuid::new_v4();
        let identity = Identity::from(id);
        assert_eq!(identity.as_str(), id.to_string());
    }

    #[test]
    fn test_identity_serializes_as_plain_string() {
        let identity = Identity::new("u1").unwrap();
        assert_eq!(serde_json::to_string(&identity).unwrap(), "\"u1\"");
    }
}
