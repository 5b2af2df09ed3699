//! Integration tests for the health endpoint

mod common;

use actix_web::test;
use serde_json::Value;

use ts_api::app::create_app;
use ts_api::routes::health::DatabaseHealth;

use common::app_state_with;

#[actix_web::test]
async fn test_health_reports_running() {
    let app = test::init_service(create_app(app_state_with(DatabaseHealth::Healthy))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["api_status"], "running");
    assert_eq!(body["database_status"], "healthy");
}

#[actix_web::test]
async fn test_health_degraded_when_database_down() {
    for (health, status) in [(DatabaseHealth::Unhealthy, "unhealthy"), (DatabaseHealth::Degraded, "degraded")] {
        let app = test::init_service(create_app(app_state_with(health))).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 503);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["api_status"], "degraded");
        assert_eq!(body["database_status"], status);
    }
}
