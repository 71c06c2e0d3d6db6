//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`: the
//! Content Store (PostgreSQL via SeaORM, or in-memory), operator auth, the
//! comment rate limiter and the Image Service client.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory Content Store only
//! - `postgres` - PostgreSQL Content Store via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `rate-limit` - Rate limiting via governor
//! - `image` - Image Service HTTP client via reqwest

pub mod memory;

#[cfg(feature = "postgres")]
pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

#[cfg(feature = "image")]
pub mod image;

pub use memory::InMemoryContentStore;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, connect};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

#[cfg(feature = "image")]
pub use image::{HttpImageService, ImageServiceConfig};
