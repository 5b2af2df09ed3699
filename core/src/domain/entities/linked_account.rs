//! Third-party sign-in accounts linked to a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A provider account (e.g. Google) linked to a local user.
///
/// Unique per `(user_id, provider)` and per `(provider, provider_user_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Provider key, e.g. `google`
    pub provider: String,
    /// Subject identifier assigned by the provider
    pub provider_user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub image_url: Option<String>,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub scope: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkedAccount {
    pub fn new(user_id: Uuid, provider: impl Into<String>, provider_user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            provider: provider.into(),
            provider_user_id: provider_user_id.into(),
            email: None,
            name: None,
            image_url: None,
            access_token: None,
            refresh_token: None,
            expires_at: None,
            scope: None,
            created_at: now,
            updated_at: now,
        }
    }
}
