pub mod performance;
pub mod rate_limit;

pub use performance::*;
pub use rate_limit::{rate_limit_key, RateLimiter, RateLimiterMiddleware};
