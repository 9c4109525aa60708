//! Proxy service implementation

use std::sync::Arc;

use crate::domain::{ActivationRecord, GetNumberParams, UpstreamAction, UpstreamRequest, UpstreamResponse};
use crate::errors::ProxyResult;
use crate::repositories::CacheStore;
use crate::services::upstream::{CircuitState, Clock, UpstreamClient};

use super::policy::{activation_key, CachePolicy, CachePolicyTable};

/// Proxy service wrapping upstream calls with per-operation caching.
///
/// Errors from the upstream client propagate unchanged. Cache failures never
/// fail an operation: a failed or corrupt read is a miss and a failed write is
/// logged and skipped.
pub struct ProxyService {
    client: Arc<UpstreamClient>,
    cache: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    policies: CachePolicyTable,
}

impl ProxyService {
    /// Create a new proxy service
    ///
    /// # Arguments
    ///
    /// * `client` - Upstream client used for every provider call
    /// * `cache` - Store for cached responses and activation records
    /// * `clock` - Time source for activation record timestamps
    /// * `policies` - Cache lifetimes per operation
    pub fn new(
        client: Arc<UpstreamClient>,
        cache: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        policies: CachePolicyTable,
    ) -> Self {
        Self {
            client,
            cache,
            clock,
            policies,
        }
    }

    pub async fn circuit_state(&self) -> CircuitState {
        self.client.circuit_state().await
    }

    /// Allocate a phone number.
    ///
    /// Never served from cache. When the provider returns an activation id, an
    /// [`ActivationRecord`] is stored for it.
    pub async fn get_number(&self, params: &GetNumberParams) -> ProxyResult<UpstreamResponse> {
        let request = UpstreamRequest::get_number(params);

        match self.client.call(&request).await {
            Ok(response) => {
                let activation = response.activation();
                if let Some(activation) = &activation {
                    self.store_activation(&params.token, activation, &response).await;
                }
                tracing::info!(
                    country = %params.country,
                    service = %params.service,
                    activation = ?activation,
                    "Number obtained"
                );
                Ok(response)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    country = %params.country,
                    service = %params.service,
                    "Failed to get number"
                );
                Err(e)
            }
        }
    }

    /// Fetch the SMS for an activation, cached per the SMS policy
    pub async fn get_sms(&self, token: &str, activation: &str) -> ProxyResult<UpstreamResponse> {
        let request = UpstreamRequest::for_activation(UpstreamAction::GetSms, token, activation);

        match self.cached_call(&self.policies.sms, token, activation, &request).await {
            Ok(response) => {
                tracing::info!(activation = %activation, has_sms = response.has_sms(), "SMS requested");
                Ok(response)
            }
            Err(e) => {
                tracing::error!(error = %e, activation = %activation, "Failed to get SMS");
                Err(e)
            }
        }
    }

    /// Cancel an activation and drop everything cached for it
    pub async fn cancel_number(&self, token: &str, activation: &str) -> ProxyResult<UpstreamResponse> {
        let request = UpstreamRequest::for_activation(UpstreamAction::CancelNumber, token, activation);

        match self.client.call(&request).await {
            Ok(response) => {
                self.invalidate(token, activation).await;
                tracing::info!(
                    activation = %activation,
                    status = ?response.status(),
                    "Number canceled"
                );
                Ok(response)
            }
            Err(e) => {
                tracing::error!(error = %e, activation = %activation, "Failed to cancel number");
                Err(e)
            }
        }
    }

    /// Fetch the activation status, cached per the status policy
    pub async fn get_status(&self, token: &str, activation: &str) -> ProxyResult<UpstreamResponse> {
        let request = UpstreamRequest::for_activation(UpstreamAction::GetStatus, token, activation);

        match self.cached_call(&self.policies.status, token, activation, &request).await {
            Ok(response) => {
                tracing::info!(activation = %activation, status = ?response.status(), "Status fetched");
                Ok(response)
            }
            Err(e) => {
                tracing::error!(error = %e, activation = %activation, "Failed to get status");
                Err(e)
            }
        }
    }

    /// Serve from cache, or call upstream and cache the success under `policy`
    async fn cached_call(
        &self,
        policy: &CachePolicy,
        token: &str,
        activation: &str,
        request: &UpstreamRequest,
    ) -> ProxyResult<UpstreamResponse> {
        let key = policy.key(token, activation);

        if let Some(cached) = self.read_cached(&key).await {
            tracing::debug!(cache = policy.prefix, activation = %activation, "Cache hit");
            return Ok(cached);
        }
        tracing::debug!(cache = policy.prefix, activation = %activation, "Cache miss");

        let response = self.client.call(request).await?;
        let ttl = policy.ttl_for(&response);
        self.write_cached(&key, &response, ttl).await;

        Ok(response)
    }

    async fn read_cached(&self, key: &str) -> Option<UpstreamResponse> {
        let raw = match self.cache.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "Cache read failed, falling back to upstream");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable cache entry");
                None
            }
        }
    }

    async fn write_cached(&self, key: &str, response: &UpstreamResponse, ttl: u64) {
        let encoded = match serde_json::to_string(response) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode response for cache");
                return;
            }
        };

        if let Err(e) = self.cache.set_with_expiry(key, &encoded, ttl).await {
            tracing::warn!(error = %e, ttl = ttl, "Cache write failed");
        }
    }

    async fn store_activation(&self, token: &str, activation: &str, response: &UpstreamResponse) {
        let record = ActivationRecord::active(response.number(), self.clock.now());

        let encoded = match serde_json::to_string(&record) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode activation record");
                return;
            }
        };

        let key = activation_key(token, activation);
        if let Err(e) = self
            .cache
            .set_with_expiry(&key, &encoded, self.policies.activation_ttl)
            .await
        {
            tracing::warn!(error = %e, activation = %activation, "Failed to store activation record");
        }
    }

    async fn invalidate(&self, token: &str, activation: &str) {
        for key in self.policies.activation_keys(token, activation) {
            if let Err(e) = self.cache.delete(&key).await {
                tracing::warn!(error = %e, activation = %activation, "Failed to invalidate cache entry");
            }
        }
    }
}
