//! HTTP transport to the upstream provider

pub mod reqwest_transport;


pub use reqwest_transport::ReqwestTransport;
