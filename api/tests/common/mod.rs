//! Shared fixtures for API integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::web;
use sp_api::{build_proxy_service, AppState};
use sp_core::errors::TransportError;
use sp_core::repositories::CacheStore;
use sp_core::services::{Clock, HttpTransport, SystemClock, TransportResponse};
use sp_infra::MemoryCacheStore;
use sp_shared::config::ProxyConfig;

pub const TOKEN: &str = "0123456789abcdef0123456789abcdef";

/// Transport answering each action with a fixed provider response
pub struct StubTransport {
    failure_status: Option<u16>,
    envelope_error: Option<String>,
    calls: AtomicUsize,
    actions: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn healthy() -> Self {
        Self {
            failure_status: None,
            envelope_error: None,
            calls: AtomicUsize::new(0),
            actions: Mutex::new(Vec::new()),
        }
    }

    /// Every call answers with `status` and an empty body
    pub fn failing(status: u16) -> Self {
        Self {
            failure_status: Some(status),
            ..Self::healthy()
        }
    }

    /// Every call answers 200 with an error envelope carrying `message`
    pub fn rejecting(message: &str) -> Self {
        Self {
            envelope_error: Some(message.to_string()),
            ..Self::healthy()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn get(&self, query: &[(String, String)]) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let action = query
            .iter()
            .find(|(name, _)| name == "action")
            .map(|(_, value)| value.clone())
            .unwrap_or_default();
        self.actions.lock().unwrap().push(action.clone());

        if let Some(status) = self.failure_status {
            return Ok(TransportResponse::new(status, ""));
        }
        if let Some(message) = &self.envelope_error {
            let body = serde_json::json!({ "code": "error", "message": message });
            return Ok(TransportResponse::new(200, body.to_string()));
        }

        let body = match action.as_str() {
            "getNumber" => r#"{"code":"ok","number":"79001234567","activation":"12345"}"#,
            "getSms" => r#"{"code":"ok","sms":"4821"}"#,
            "getStatus" => r#"{"code":"ok","status":"SMS received. Activation finished"}"#,
            _ => r#"{"code":"ok"}"#,
        };
        Ok(TransportResponse::new(200, body))
    }
}

/// Defaults without retry delays so failing calls return immediately
pub fn test_config() -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.upstream.max_retries = 0;
    config.upstream.retry_base_delay_ms = 0;
    config
}

pub struct TestContext {
    pub config: ProxyConfig,
    pub store: Arc<MemoryCacheStore>,
    pub transport: Arc<StubTransport>,
    pub state: web::Data<AppState>,
}

impl TestContext {
    pub fn new(transport: StubTransport, config: ProxyConfig) -> Self {
        let store = Arc::new(MemoryCacheStore::new());
        let transport = Arc::new(transport);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let proxy = build_proxy_service(transport.clone(), store.clone(), clock, &config);

        Self {
            config,
            store,
            transport,
            state: web::Data::new(AppState::new(proxy)),
        }
    }

    pub fn cache(&self) -> Arc<dyn CacheStore> {
        self.store.clone()
    }
}
