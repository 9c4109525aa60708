//! Value objects exchanged between the orchestrator and the upstream client.

pub mod request;
pub mod response;

pub use request::{GetNumberParams, UpstreamAction, UpstreamRequest};
pub use response::{ResponseEnvelope, UpstreamResponse, DEFAULT_UPSTREAM_ERROR};
