//! # Quill Shared
//!
//! Wire types shared between the API server and its clients (the public
//! site and the admin console).

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
