//! # Quill Core
//!
//! The domain layer of the Quill content platform: posts, categories and
//! comments, the ports the Content Store and Image Service adapters implement,
//! and the authoring/moderation workflows built on top of them.
//!
//! This crate has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
