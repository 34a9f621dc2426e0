use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{error, info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use h2h_api::app::create_app;
use h2h_api::config::Config;
use h2h_api::routes::AppState;
use h2h_core::repositories::InMemoryRevokedTokenStore;
use h2h_core::services::auth::{AuthService, AuthServiceConfig};
use h2h_core::services::authorization::OwnershipResolver;
use h2h_core::services::security::validate_security_settings;
use h2h_core::services::token::{
    Signer, TokenCleanupConfig, TokenCleanupService, TokenService, TokenServiceConfig,
};
use h2h_infra::database::{
    DatabasePool, MySqlOwnershipRepository, MySqlPrincipalRepository, MySqlRefreshTokenRepository,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.environment.default_log_filter())),
        )
        .init();

    info!(environment = %config.environment, "Starting Happy2Help API server");

    let check = validate_security_settings(&config.auth);
    for warning in &check.warnings {
        warn!("Security setting: {}", warning);
    }
    if !check.is_valid() {
        for problem in &check.errors {
            error!("Security setting: {}", problem);
        }
        anyhow::bail!("refusing to start with invalid security settings");
    }

    let pool = DatabasePool::new(&config.database)
        .await
        .context("failed to connect to the database")?;
    pool.run_migrations()
        .await
        .context("failed to apply database migrations")?;
    info!("{}", pool.get_statistics());

    let principals = Arc::new(MySqlPrincipalRepository::new(pool.get_pool().clone()));
    let refresh_tokens = Arc::new(MySqlRefreshTokenRepository::new(pool.get_pool().clone()));
    let ownership = Arc::new(MySqlOwnershipRepository::new(pool.get_pool().clone()));

    let signer = Signer::new(&config.auth.jwt, Arc::new(InMemoryRevokedTokenStore::new()))
        .context("invalid JWT signing configuration")?;
    let token_service = Arc::new(TokenService::new(
        refresh_tokens,
        Arc::new(signer),
        TokenServiceConfig::from_auth_config(&config.auth),
    ));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&principals),
        Arc::clone(&token_service),
        AuthServiceConfig::from_auth_config(&config.auth),
    ));
    let resolver = Arc::new(OwnershipResolver::new(
        ownership,
        Duration::from_millis(config.auth.ownership_lookup_timeout_ms),
    ));

    let cleanup = Arc::new(TokenCleanupService::new(
        Arc::clone(&token_service),
        TokenCleanupConfig::from_auth_config(&config.auth),
    ));
    let cleanup_task = cleanup.start();

    let app_state = web::Data::new(AppState {
        auth_service,
        principal_repository: principals,
        resolver,
        cleanup: Some(Arc::clone(&cleanup)),
        auth_config: config.auth.clone(),
        trusted_proxies: config.server.trusted_proxies.clone(),
    });

    let bind_address = config.bind_address();
    info!(address = %bind_address, "Server binding");

    let mut server = HttpServer::new(move || create_app(app_state.clone()).wrap(TracingLogger::default()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("server error")?;

    info!("Shutting down");
    cleanup.stop();
    if let Some(task) = cleanup_task {
        if let Err(e) = task.await {
            warn!(error = %e, "Cleanup task ended abnormally");
        }
    }
    pool.close().await;

    Ok(())
}
