//! Domain entities persisted in the cache store.

pub mod activation;

pub use activation::{ActivationRecord, ACTIVATION_STATUS_ACTIVE};
