//! User entity representing a registered account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::Identity;

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Primary email address (unique)
    pub email: String,

    /// Name as reported by the sign-in provider
    pub name: Option<String>,

    /// Preferred display name
    pub display_name: Option<String>,

    /// Full legal name
    pub full_name: Option<String>,

    /// Avatar URL
    pub image_url: Option<String>,

    /// Free-form profile text
    pub bio: Option<String>,

    /// When the email was verified; `None` while unverified
    pub email_verified_at: Option<DateTime<Utc>>,

    /// Timestamp of the user's last login
    pub last_login_at: Option<DateTime<Utc>>,

    /// Whether the account may sign in
    pub is_active: bool,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active, unverified user
    pub fn new(email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: None,
            display_name: None,
            full_name: None,
            image_url: None,
            bio: None,
            email_verified_at: None,
            last_login_at: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// The identity session credentials are issued to
    pub fn identity(&self) -> Identity {
        Identity::from(self.id)
    }

    /// Whether the email address has been verified
    pub fn is_email_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }

    /// Marks the email verified at `at`; keeps the first verification time
    pub fn verify_email(&mut self, at: DateTime<Utc>) {
        if self.email_verified_at.is_none() {
            self.email_verified_at = Some(at);
            self.updated_at = at;
        }
    }

    /// Records a successful login
    pub fn record_login(&mut self, at: DateTime<Utc>) {
        self.last_login_at = Some(at);
        self.updated_at = at;
    }

    /// Disables the account
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}
