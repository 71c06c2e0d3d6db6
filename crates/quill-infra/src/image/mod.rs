//! Image Service client.

mod http;

pub use http::{HttpImageService, ImageServiceConfig};
