//! Rate limiting for the public comment form.

mod memory;

pub use memory::{InMemoryRateLimiter, RateLimitConfig};
