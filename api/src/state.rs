//! Application state shared by all workers

use std::sync::Arc;

use ts_core::repositories::CredentialStore;
use ts_core::services::token::{Clock, SystemClock, TokenService};

use crate::routes::health::HealthProbe;

/// Application state that holds shared services
pub struct AppState<S, C = SystemClock>
where
    S: CredentialStore,
    C: Clock,
{
    pub token_service: Arc<TokenService<S, C>>,
    pub database: Arc<dyn HealthProbe>,
}

impl<S, C> AppState<S, C>
where
    S: CredentialStore,
    C: Clock,
{
    pub fn new(token_service: Arc<TokenService<S, C>>, database: Arc<dyn HealthProbe>) -> Self {
        Self {
            token_service,
            database,
        }
    }
}
