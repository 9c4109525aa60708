//! Caching proxy service
//!
//! Maps the four provider operations onto upstream calls and applies a
//! per-operation cache policy: allocation is never cached, SMS and status
//! results are cached with a short TTL that is extended once the answer can no
//! longer change, and cancellation invalidates everything kept for the
//! activation.

mod policy;
mod service;


pub use policy::{
    activation_key, CachePolicy, CachePolicyTable, ACTIVATION_PREFIX, SMS_PREFIX, STATUS_PREFIX,
    TERMINAL_STATUSES,
};
pub use service::ProxyService;
