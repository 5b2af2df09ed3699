use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use log::info;

use ts_api::app::create_app;
use ts_api::state::AppState;
use ts_core::services::token::{TokenService, TokenServiceConfig};
use ts_infra::database::{DatabasePool, MySqlCredentialStore};
use ts_shared::config::{AppConfig, Environment, LogFormat, LoggingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger before anything else can fail
    init_logger(&LoggingConfig::from_env(Environment::from_env()));

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    info!("Starting Tessera API Server ({})", config.environment);

    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to connect to database")?;
    pool.run_migrations().await.context("Failed to apply database schema")?;
    info!("{}", pool.get_statistics());

    let store = MySqlCredentialStore::new(pool.get_pool().clone());
    let token_service = TokenService::new(store, TokenServiceConfig::from(&config.auth.jwt))
        .context("Failed to initialize token service")?;

    let app_state = web::Data::new(AppState::new(Arc::new(token_service), Arc::new(pool.clone())));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    HttpServer::new(move || create_app(app_state.clone()))
        .workers(config.server.workers)
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    pool.close().await;
    Ok(())
}

fn init_logger(logging: &LoggingConfig) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::new().default_filter_or(logging.level.as_str()));
    if logging.format == LogFormat::Compact {
        builder.format_target(false).format_module_path(false);
    }
    builder.init();
}
