//! Connection-pooled reqwest transport
//!
//! One `reqwest::Client` is shared by every request, so TCP/TLS connections are
//! reused across retries and polling traffic. Timeouts are short because the
//! provider is expected to answer quickly; a hung upstream must not stall the
//! pool.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Url};

use sp_core::errors::TransportError;
use sp_core::services::{HttpTransport, TransportResponse};
use sp_shared::config::{PerformanceConfig, UpstreamConfig};

use crate::InfrastructureError;

/// HTTP transport pointed at the provider's single GET endpoint
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Build the pooled client
    ///
    /// # Arguments
    /// * `upstream` - Base URL, timeouts, keep-alive and user agent
    /// * `performance` - Connection pool size
    pub fn new(
        upstream: &UpstreamConfig,
        performance: &PerformanceConfig,
    ) -> Result<Self, InfrastructureError> {
        let base_url = Url::parse(&upstream.base_url).map_err(|e| {
            InfrastructureError::Config(format!("Invalid upstream URL '{}': {}", upstream.base_url, e))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(upstream.user_agent.as_str())
            .timeout(Duration::from_secs(upstream.timeout_secs))
            .connect_timeout(Duration::from_secs(upstream.connect_timeout_secs))
            .pool_max_idle_per_host(performance.connection_pool_size)
            .pool_idle_timeout(Duration::from_secs(upstream.pool_idle_secs))
            .tcp_keepalive(Duration::from_secs(upstream.keepalive_idle_secs))
            // The provider is reached over IPv4 only
            .local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
            .build()?;

        tracing::info!(
            base_url = %base_url,
            timeout_secs = upstream.timeout_secs,
            connect_timeout_secs = upstream.connect_timeout_secs,
            pool_size = performance.connection_pool_size,
            keepalive_idle_secs = upstream.keepalive_idle_secs,
            "Upstream HTTP transport created"
        );

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, query: &[(String, String)]) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .get(self.base_url.clone())
            .query(query)
            .send()
            .await
            .map_err(to_transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(to_transport_error)?;

        Ok(TransportResponse { status, body })
    }
}

fn to_transport_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::timeout(error.to_string())
    } else if error.is_connect() {
        TransportError::connect(error.to_string())
    } else {
        TransportError::other(error.to_string())
    }
}
