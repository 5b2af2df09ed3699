//! Health check endpoint

use actix_web::{web, HttpResponse};
use async_trait::async_trait;

use ts_core::repositories::CredentialStore;
use ts_core::services::token::Clock;
use ts_infra::database::DatabasePool;

use crate::dto::health::HealthResponse;
use crate::state::AppState;

/// Result of a database probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseHealth {
    Healthy,
    /// Reachable, but the probe query returned something unexpected
    Degraded,
    Unhealthy,
}

impl DatabaseHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseHealth::Healthy => "healthy",
            DatabaseHealth::Degraded => "degraded",
            DatabaseHealth::Unhealthy => "unhealthy",
        }
    }
}

/// Probe for the database behind the credential store
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> DatabaseHealth;
}

#[async_trait]
impl HealthProbe for DatabasePool {
    async fn check(&self) -> DatabaseHealth {
        match self.health_check().await {
            Ok(true) => DatabaseHealth::Healthy,
            Ok(false) => {
                log::warn!("Database answered the health probe unexpectedly; {}", self.get_statistics());
                DatabaseHealth::Degraded
            }
            Err(e) => {
                log::warn!("Database health check failed: {}; {}", e, self.get_statistics());
                DatabaseHealth::Unhealthy
            }
        }
    }
}

/// Handler for GET /health
///
/// 200 with `api_status: running` when the database answers, otherwise
/// 503 with `api_status: degraded`.
pub async fn health_check<S, C>(state: web::Data<AppState<S, C>>) -> HttpResponse
where
    S: CredentialStore + 'static,
    C: Clock + 'static,
{
    let database = state.database.check().await;
    let healthy = database == DatabaseHealth::Healthy;

    let response = HealthResponse {
        api_status: if healthy { "running" } else { "degraded" }.to_string(),
        database_status: database.as_str().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    if healthy {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
