use serde::{Deserialize, Serialize};

use crate::ports::ImageError;

/// Largest file the Image Service accepts.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// MIME types the authoring surface lets through.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Folder the Image Service stores blog images under.
pub const DEFAULT_UPLOAD_FOLDER: &str = "blog-images";

/// An image file on its way to the Image Service.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub folder: String,
    /// Ask the service to crop to 1200x630 and re-encode as JPEG.
    pub resize: bool,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
            folder: DEFAULT_UPLOAD_FOLDER.to_string(),
            resize: true,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Reject files the Image Service would refuse, before any upload.
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if !self.content_type.starts_with("image/")
            || !ALLOWED_IMAGE_TYPES.contains(&self.content_type.as_str())
        {
            return Err(ImageError::UnsupportedType(self.content_type.clone()));
        }
        if self.size() > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge {
                size: self.size(),
                limit: MAX_IMAGE_BYTES,
            });
        }
        Ok(())
    }
}

/// What the Image Service reports back for a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
    pub filename: String,
    pub size: u64,
    pub original_name: String,
}
