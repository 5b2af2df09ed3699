//! Shared fixtures for API tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;

use ts_api::routes::health::{DatabaseHealth, HealthProbe};
use ts_api::state::AppState;
use ts_core::repositories::InMemoryCredentialStore;
use ts_core::services::token::{TokenService, TokenServiceConfig};

pub const TEST_SECRET: &str = "api-test-secret";

/// Health probe that always reports the same state
pub struct StaticProbe(pub DatabaseHealth);

#[async_trait]
impl HealthProbe for StaticProbe {
    async fn check(&self) -> DatabaseHealth {
        self.0
    }
}

pub fn app_state_with(database: DatabaseHealth) -> web::Data<AppState<InMemoryCredentialStore>> {
    let service = TokenService::new(InMemoryCredentialStore::new(), TokenServiceConfig::new(TEST_SECRET))
        .expect("valid test config");
    web::Data::new(AppState::new(Arc::new(service), Arc::new(StaticProbe(database))))
}

pub fn app_state() -> web::Data<AppState<InMemoryCredentialStore>> {
    app_state_with(DatabaseHealth::Healthy)
}
