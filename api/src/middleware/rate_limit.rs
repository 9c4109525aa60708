//! Rate limiting middleware for the proxy endpoint
//!
//! Fixed-window counters per action and client IP, kept in the shared
//! cache store so every instance sees the same counts. The window starts at
//! the first counted request and rejected requests are not counted.
//! Requests without a recognised action are passed through; the handler
//! rejects them.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use sp_core::repositories::CacheStore;
use sp_shared::config::RateLimitConfig;

use crate::dto::ActionQuery;
use crate::handlers::ApiError;

/// Rate limiter middleware factory
pub struct RateLimiter {
    cache: Arc<dyn CacheStore>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter backed by `cache`
    pub fn new(cache: Arc<dyn CacheStore>, config: RateLimitConfig) -> Self {
        Self { cache, config }
    }
}

/// Counter key for an action and client
pub fn rate_limit_key(action: &str, client_ip: &str) -> String {
    format!("rate_limit:{}:{}", action, client_ip)
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimiterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimiterMiddleware {
            service: Rc::new(service),
            cache: self.cache.clone(),
            config: self.config.clone(),
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimiterMiddleware<S> {
    service: Rc<S>,
    cache: Arc<dyn CacheStore>,
    config: RateLimitConfig,
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let cache = self.cache.clone();
        let config = self.config.clone();

        Box::pin(async move {
            if config.enabled {
                if let Some((action, limit)) = action_limit(&req, &config) {
                    let client_ip = get_client_ip(&req);
                    let key = rate_limit_key(&action, &client_ip);

                    if !check_rate_limit(cache.as_ref(), &key, limit, config.window_secs).await {
                        tracing::warn!(
                            action = %action,
                            client_ip = %client_ip,
                            limit = limit,
                            "Rate limit exceeded"
                        );
                        let response = ApiError::RateLimited.error_response();
                        return Ok(req.into_response(response).map_into_right_body());
                    }
                }
            }

            let response = service.call(req).await?;
            Ok(response.map_into_left_body())
        })
    }
}

/// Report whether the request fits in the current window, counting it if so.
///
/// A store failure lets the request through.
async fn check_rate_limit(cache: &dyn CacheStore, key: &str, limit: u32, window_secs: u64) -> bool {
    match cache.get(key).await {
        Ok(Some(count)) => {
            if count.trim().parse::<i64>().map_or(false, |count| count >= i64::from(limit)) {
                return false;
            }
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "Rate limit check failed, allowing request");
            return true;
        }
    }

    if let Err(e) = cache.increment_in_window(key, window_secs).await {
        tracing::error!(error = %e, "Rate limit update failed, allowing request");
    }
    true
}

/// Action named in the query string together with its configured limit
fn action_limit(req: &ServiceRequest, config: &RateLimitConfig) -> Option<(String, u32)> {
    let action = query_action(req)?;
    config.limit_for(&action).map(|limit| (action, limit))
}

/// Decoded `action` query parameter, parsed the same way as the handler does
pub(crate) fn query_action(req: &ServiceRequest) -> Option<String> {
    web::Query::<ActionQuery>::from_query(req.query_string())
        .ok()
        .and_then(|query| query.into_inner().action)
}

/// Extract client IP address from request
pub(crate) fn get_client_ip(req: &ServiceRequest) -> String {
    // Try to get IP from X-Forwarded-For header (for reverse proxy scenarios)
    if let Some(forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            // Take the first IP from the comma-separated list
            if let Some(ip) = forwarded_str.split(',').next() {
                let ip = ip.trim();
                if !ip.is_empty() {
                    return ip.to_string();
                }
            }
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP") {
        if let Ok(ip) = real_ip.to_str() {
            return ip.trim().to_string();
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use std::time::Duration;

    #[test]
    fn test_rate_limit_key_format() {
        assert_eq!(rate_limit_key("getSms", "10.0.0.1"), "rate_limit:getSms:10.0.0.1");
    }

    #[test]
    fn test_action_limit_from_query() {
        let config = RateLimitConfig::default();

        let req = TestRequest::get()
            .uri("/?token=abc&action=cancelNumber")
            .to_srv_request();
        assert_eq!(
            action_limit(&req, &config),
            Some(("cancelNumber".to_string(), 50))
        );

        let req = TestRequest::get().uri("/?action=dropTables").to_srv_request();
        assert_eq!(action_limit(&req, &config), None);

        let req = TestRequest::get()
            .uri("/?action=cancel%4Eumber&token=abc")
            .to_srv_request();
        assert_eq!(
            action_limit(&req, &config),
            Some(("cancelNumber".to_string(), 50))
        );

        let req = TestRequest::get().uri("/health").to_srv_request();
        assert_eq!(action_limit(&req, &config), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_reopens_after_first_hit() {
        let cache = sp_infra::MemoryCacheStore::new();
        let key = rate_limit_key("cancelNumber", "10.0.0.1");

        assert!(check_rate_limit(&cache, &key, 2, 60).await);
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(check_rate_limit(&cache, &key, 2, 60).await);

        // Rejections inside the window neither count nor extend it
        for _ in 0..5 {
            assert!(!check_rate_limit(&cache, &key, 2, 60).await);
            tokio::time::advance(Duration::from_secs(5)).await;
        }
        assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some("2"));

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(check_rate_limit(&cache, &key, 2, 60).await);
        assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_client_ip_prefers_forwarded_header() {
        let req = TestRequest::get()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .peer_addr("127.0.0.1:4000".parse().unwrap())
            .to_srv_request();
        assert_eq!(get_client_ip(&req), "203.0.113.7");

        let req = TestRequest::get()
            .peer_addr("127.0.0.1:4000".parse().unwrap())
            .to_srv_request();
        assert_eq!(get_client_ip(&req), "127.0.0.1");
    }
}
