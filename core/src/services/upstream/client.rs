//! Retrying, circuit-breaking client for the upstream provider

use std::future::Future;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};

use crate::domain::{ResponseEnvelope, UpstreamRequest, UpstreamResponse};
use crate::errors::{ProxyError, ProxyResult, TransportError};
use crate::repositories::CacheStore;

use super::circuit_breaker::{CircuitBreaker, CircuitState};
use super::config::UpstreamClientConfig;
use super::retry::RetryPolicy;
use super::traits::{Clock, HttpTransport, TransportResponse};

const INVALID_JSON_MESSAGE: &str = "Invalid JSON response from API";

/// Client for the upstream provider.
///
/// Every call is gated by the circuit breaker, retried according to the
/// [`RetryPolicy`], and its final outcome is recorded in the breaker.
pub struct UpstreamClient {
    transport: Arc<dyn HttpTransport>,
    breaker: CircuitBreaker,
    retry: RetryPolicy,
    concurrency: usize,
}

impl UpstreamClient {
    /// Create a new upstream client
    ///
    /// # Arguments
    ///
    /// * `transport` - Pooled HTTP transport pointed at the provider
    /// * `cache` - Store holding the circuit breaker counters
    /// * `clock` - Time source for the breaker cooldown
    /// * `config` - Retry, breaker and batch settings
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        cache: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        config: UpstreamClientConfig,
    ) -> Self {
        Self {
            transport,
            breaker: CircuitBreaker::new(cache, clock, config.breaker),
            retry: config.retry,
            concurrency: config.concurrency.max(1),
        }
    }

    pub async fn circuit_state(&self) -> CircuitState {
        self.breaker.state().await
    }

    /// Perform a single upstream call.
    ///
    /// # Returns
    ///
    /// * `Ok(UpstreamResponse)` - Parsed success payload
    /// * `Err(ProxyError::UpstreamUnavailable)` - Circuit open, nothing was sent
    /// * `Err(ProxyError::Transport)` - Network failure after all retries
    /// * `Err(ProxyError::Upstream)` - Non-200 status, invalid JSON or error envelope
    pub async fn call(&self, request: &UpstreamRequest) -> ProxyResult<UpstreamResponse> {
        self.ensure_closed(request).await?;
        self.execute(request).await
    }

    /// Perform a call that is abandoned as soon as `cancel` resolves.
    ///
    /// The in-flight transport future is dropped on cancellation, which aborts
    /// the outbound request. A cancelled call leaves the breaker untouched.
    pub async fn call_with_cancellation<F>(
        &self,
        request: &UpstreamRequest,
        cancel: F,
    ) -> ProxyResult<UpstreamResponse>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.call(request) => result,
            _ = cancel => {
                tracing::debug!(action = %request.action(), "Upstream call cancelled by caller");
                Err(ProxyError::Cancelled)
            }
        }
    }

    /// Perform several calls with at most `concurrency` in flight.
    ///
    /// The breaker is checked once, before anything is sent. Afterwards each
    /// request gets its own retries and breaker bookkeeping, and the result
    /// at index `i` always belongs to request `i`.
    pub async fn call_many(
        &self,
        requests: &[UpstreamRequest],
    ) -> ProxyResult<Vec<ProxyResult<UpstreamResponse>>> {
        if self.breaker.is_open().await {
            tracing::warn!(batch_size = requests.len(), "Circuit breaker open, rejecting batch");
            return Err(ProxyError::UpstreamUnavailable);
        }

        let results: Vec<ProxyResult<UpstreamResponse>> = stream::iter(requests)
            .map(|request| self.execute(request))
            .buffered(self.concurrency)
            .collect()
            .await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::debug!(
            batch_size = requests.len(),
            failed = failed,
            concurrency = self.concurrency,
            "Upstream batch completed"
        );

        Ok(results)
    }

    async fn ensure_closed(&self, request: &UpstreamRequest) -> ProxyResult<()> {
        if self.breaker.is_open().await {
            tracing::warn!(action = %request.action(), "Circuit breaker open, rejecting call");
            return Err(ProxyError::UpstreamUnavailable);
        }
        Ok(())
    }

    async fn execute(&self, request: &UpstreamRequest) -> ProxyResult<UpstreamResponse> {
        let query = request.to_query();
        let outcome = self.send_with_retry(request, &query).await;
        let result = Self::interpret(outcome);

        match &result {
            Ok(_) => self.breaker.record_success().await,
            Err(e) => {
                tracing::debug!(action = %request.action(), error = %e, "Upstream call failed");
                self.breaker.record_failure().await;
            }
        }

        result
    }

    async fn send_with_retry(
        &self,
        request: &UpstreamRequest,
        query: &[(String, String)],
    ) -> Result<TransportResponse, TransportError> {
        let mut retries = 0;

        loop {
            let outcome = self.transport.get(query).await;
            if retries >= self.retry.max_retries || !self.retry.should_retry(&outcome) {
                return outcome;
            }

            retries += 1;
            let delay = self.retry.delay_for(retries);
            match &outcome {
                Ok(response) => tracing::warn!(
                    action = %request.action(),
                    attempt = retries,
                    status = response.status,
                    delay_ms = delay.as_millis() as u64,
                    "Upstream returned server error, retrying"
                ),
                Err(e) => tracing::warn!(
                    action = %request.action(),
                    attempt = retries,
                    error = %e,
                    delay_ms = delay.as_millis() as u64,
                    "Upstream transport failure, retrying"
                ),
            }
            tokio::time::sleep(delay).await;
        }
    }

    fn interpret(
        outcome: Result<TransportResponse, TransportError>,
    ) -> ProxyResult<UpstreamResponse> {
        let response = outcome?;

        if response.status != 200 {
            return Err(ProxyError::Upstream {
                message: format!("API returned status code: {}", response.status),
                status: Some(response.status),
            });
        }

        match UpstreamResponse::parse(&response.body) {
            Ok(ResponseEnvelope::Success(parsed)) => Ok(parsed),
            Ok(ResponseEnvelope::Error { message }) => Err(ProxyError::upstream(message)),
            Err(_) => Err(ProxyError::upstream(INVALID_JSON_MESSAGE)),
        }
    }
}
