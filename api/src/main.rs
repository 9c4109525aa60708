use std::sync::Arc;

use actix_web::{web, HttpServer};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sp_api::{build_proxy_service, create_app, AppState};
use sp_core::services::{Clock, SystemClock};
use sp_shared::config::{LogFormat, LoggingConfig, ProxyConfig};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = ProxyConfig::from_env();
    init_tracing(&config.logging);
    config.validate()?;

    tracing::info!(
        environment = %config.environment,
        upstream = %config.upstream.base_url,
        store = ?config.store.backend,
        threshold = config.circuit_breaker.threshold,
        cooldown_secs = config.circuit_breaker.cooldown_secs,
        concurrency = config.performance.concurrent_requests,
        "Configuration loaded"
    );

    let cache = sp_infra::create_cache_store(&config.store).await?;
    let transport = sp_infra::create_transport(&config)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let proxy = build_proxy_service(transport, cache.clone(), clock, &config);
    let state = web::Data::new(AppState::new(proxy));

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "Starting SMS proxy server");

    let app_config = config.clone();
    let mut server = HttpServer::new(move || {
        create_app(state.clone(), cache.clone(), &app_config)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).init(),
    }
}
