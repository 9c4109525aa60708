//! Route handlers
//!
//! - `proxy` - the single `GET /` endpoint dispatching on `action`
//! - `health` - liveness and circuit state

pub mod health;
pub mod proxy;

use std::sync::Arc;

use sp_core::services::ProxyService;

/// Application state shared by all handlers
pub struct AppState {
    pub proxy: Arc<ProxyService>,
}

impl AppState {
    pub fn new(proxy: Arc<ProxyService>) -> Self {
        Self { proxy }
    }
}
