//! Application factory
//!
//! Builds the actix-web application from already-constructed services so the
//! same wiring serves `main` and the integration tests.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Condition,
    web, App, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use sp_core::repositories::CacheStore;
use sp_core::services::{
    CachePolicyTable, Clock, HttpTransport, ProxyService, UpstreamClient, UpstreamClientConfig,
};
use sp_shared::config::ProxyConfig;
use sp_shared::ErrorResponse;

use crate::middleware::{RateLimiter, ResponseTiming};
use crate::routes::{health::health_check, proxy::dispatch, AppState};

/// Wire the upstream client and proxy service from configuration
pub fn build_proxy_service(
    transport: Arc<dyn HttpTransport>,
    cache: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    config: &ProxyConfig,
) -> Arc<ProxyService> {
    let client = UpstreamClient::new(
        transport,
        cache.clone(),
        clock.clone(),
        UpstreamClientConfig::from(config),
    );

    Arc::new(ProxyService::new(
        Arc::new(client),
        cache,
        clock,
        CachePolicyTable::from(&config.cache),
    ))
}

/// Create and configure the application with all dependencies
///
/// `cache` backs the rate limiter counters; it is normally the same store the
/// proxy service caches into.
pub fn create_app(
    app_state: web::Data<AppState>,
    cache: Arc<dyn CacheStore>,
    config: &ProxyConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let rate_limiter = RateLimiter::new(cache, config.rate_limit.clone());
    let timing = ResponseTiming::new(config.logging.slow_request_threshold_ms);

    App::new()
        .app_data(app_state)
        // Middleware order: rate limiting innermost, timing around it, request spans outermost
        .wrap(rate_limiter)
        .wrap(timing)
        .wrap(Condition::new(config.logging.enabled, TracingLogger::default()))
        .route("/health", web::get().to(health_check))
        .route("/", web::get().to(dispatch))
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        "The requested resource was not found",
    ))
}
