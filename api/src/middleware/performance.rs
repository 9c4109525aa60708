//! Response timing middleware
//!
//! Adds `X-Response-Time` to every response. GET responses get a short
//! public `Cache-Control` when they only read state; actions that buy or
//! release a number are marked `no-store`. Requests slower than the
//! configured threshold are logged at warn.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::{
        header::{self, HeaderName, HeaderValue},
        Method,
    },
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
    time::{Duration, Instant},
};

use super::rate_limit::{get_client_ip, query_action};

pub const RESPONSE_TIME_HEADER: &str = "x-response-time";
pub const GET_CACHE_CONTROL: &str = "public, max-age=10";
pub const NO_STORE_CACHE_CONTROL: &str = "no-store";

/// Cache-Control for a GET naming `action`
///
/// Requests without an action (the health check) are cacheable.
pub fn cache_control_for(action: Option<&str>) -> &'static str {
    match action {
        None | Some("getSms") | Some("getStatus") => GET_CACHE_CONTROL,
        Some(_) => NO_STORE_CACHE_CONTROL,
    }
}

/// Response timing middleware factory
pub struct ResponseTiming {
    slow_threshold: Duration,
}

impl ResponseTiming {
    pub fn new(slow_threshold_ms: u64) -> Self {
        Self {
            slow_threshold: Duration::from_millis(slow_threshold_ms),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ResponseTiming
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ResponseTimingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ResponseTimingService {
            service: Rc::new(service),
            slow_threshold: self.slow_threshold,
        }))
    }
}

pub struct ResponseTimingService<S> {
    service: Rc<S>,
    slow_threshold: Duration,
}

impl<S, B> Service<ServiceRequest> for ResponseTimingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let slow_threshold = self.slow_threshold;

        let action = query_action(&req);
        let cache_control =
            (req.method() == Method::GET).then(|| cache_control_for(action.as_deref()));
        let action = action.unwrap_or_default();
        let client_ip = get_client_ip(&req);
        let started = Instant::now();

        Box::pin(async move {
            let mut response = service.call(req).await?;
            let elapsed = started.elapsed();
            let duration_ms = elapsed.as_secs_f64() * 1000.0;

            let headers = response.headers_mut();
            if let Ok(value) = HeaderValue::from_str(&format!("{:.2}ms", duration_ms)) {
                headers.insert(HeaderName::from_static(RESPONSE_TIME_HEADER), value);
            }
            if let Some(cache_control) = cache_control {
                headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache_control));
            }

            if elapsed > slow_threshold {
                tracing::warn!(
                    duration_ms = duration_ms,
                    action = %action,
                    client_ip = %client_ip,
                    "Slow API request"
                );
            }

            Ok(response)
        })
    }
}
