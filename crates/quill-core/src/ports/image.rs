//! Image Service port.

use async_trait::async_trait;

use crate::domain::{ImageUpload, UploadedImage};

/// Client of the image upload/resize endpoint.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Validate and send `upload`; only a stored image yields a URL.
    async fn upload(&self, upload: ImageUpload) -> Result<UploadedImage, ImageError>;
}

/// Image upload errors.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("No file uploaded")]
    Empty,

    #[error("Unsupported image type: {0} (supported formats: JPEG, PNG, WebP, GIF)")]
    UnsupportedType(String),

    #[error("Image is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("Image service rejected the upload: {0}")]
    Rejected(String),

    #[error("Image service unreachable: {0}")]
    Transport(String),
}
