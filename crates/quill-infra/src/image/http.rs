//! Client for the Image Service's `POST /api/upload-image` endpoint.
//!
//! Uploads are checked against the same limits the service enforces before
//! any bytes leave the process.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use quill_core::domain::{DEFAULT_UPLOAD_FOLDER, ImageUpload, UploadedImage};
use quill_core::ports::{ImageError, ImageUploader};

const UPLOAD_PATH: &str = "/api/upload-image";

#[derive(Debug, Clone)]
pub struct ImageServiceConfig {
    /// Base URL of the Image Service, without the upload path.
    pub base_url: String,
    /// Folder used when an upload does not name one.
    pub folder: String,
    pub timeout: Duration,
}

impl Default for ImageServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            folder: DEFAULT_UPLOAD_FOLDER.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ImageServiceConfig {
    /// Reads `IMAGE_SERVICE_URL` and `IMAGE_UPLOAD_FOLDER`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("IMAGE_SERVICE_URL").unwrap_or(defaults.base_url),
            folder: std::env::var("IMAGE_UPLOAD_FOLDER").unwrap_or(defaults.folder),
            timeout: defaults.timeout,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), UPLOAD_PATH)
    }
}

/// Body returned by the Image Service, for both success and failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadReply {
    #[serde(default)]
    success: bool,
    url: Option<String>,
    filename: Option<String>,
    size: Option<u64>,
    original_name: Option<String>,
    error: Option<String>,
}

pub struct HttpImageService {
    client: reqwest::Client,
    config: ImageServiceConfig,
}

impl HttpImageService {
    pub fn new(config: ImageServiceConfig) -> Result<Self, ImageError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ImageError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ImageError> {
        Self::new(ImageServiceConfig::from_env())
    }
}

/// Map an Image Service reply to the upload result.
///
/// Only a 2xx reply with `success: true` and a URL counts as stored.
pub(crate) fn interpret_reply(
    status: u16,
    body: &str,
    upload: &ImageUpload,
) -> Result<UploadedImage, ImageError> {
    let reply: Option<UploadReply> = serde_json::from_str(body).ok();

    if !(200..300).contains(&status) {
        let reason = reply
            .and_then(|r| r.error)
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(ImageError::Rejected(reason));
    }

    let reply = reply.ok_or_else(|| {
        ImageError::Rejected("Image Service returned an unreadable body".to_string())
    })?;
    if !reply.success {
        return Err(ImageError::Rejected(
            reply.error.unwrap_or_else(|| "Upload failed".to_string()),
        ));
    }
    let url = reply
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ImageError::Rejected("Image Service returned no URL".to_string()))?;

    Ok(UploadedImage {
        url,
        filename: reply.filename.unwrap_or_default(),
        size: reply.size.unwrap_or(upload.size() as u64),
        original_name: reply
            .original_name
            .unwrap_or_else(|| upload.filename.clone()),
    })
}

#[async_trait]
impl ImageUploader for HttpImageService {
    async fn upload(&self, mut upload: ImageUpload) -> Result<UploadedImage, ImageError> {
        upload.validate()?;
        if upload.folder.is_empty() {
            upload.folder = self.config.folder.clone();
        }

        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.filename.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| ImageError::UnsupportedType(e.to_string()))?;
        let form = Form::new()
            .part("image", part)
            .text("folder", upload.folder.clone())
            .text("resize", upload.resize.to_string());

        tracing::debug!(
            filename = %upload.filename,
            size = upload.size(),
            folder = %upload.folder,
            "Sending image to Image Service"
        );

        let resp = self
            .client
            .post(self.config.endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImageError::Transport(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ImageError::Transport(e.to_string()))?;
        let result = interpret_reply(status, &body, &upload);

        match &result {
            Ok(image) => tracing::info!(url = %image.url, size = image.size, "Image uploaded"),
            Err(e) => tracing::warn!(status, error = %e, "Image upload failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::domain::MAX_IMAGE_BYTES;

    fn upload(size: usize) -> ImageUpload {
        ImageUpload::new("cover.png", "image/png", vec![0u8; size])
    }

    #[tokio::test]
    async fn test_oversized_image_rejected_before_sending() {
        // Nothing listens on this port; a request attempt would surface as Transport.
        let service = HttpImageService::new(ImageServiceConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..ImageServiceConfig::default()
        })
        .unwrap();

        let result = service.upload(upload(6 * 1024 * 1024)).await;
        assert!(matches!(
            result,
            Err(ImageError::TooLarge { limit, .. }) if limit == MAX_IMAGE_BYTES
        ));
    }

    #[tokio::test]
    async fn test_non_image_rejected_before_sending() {
        let service = HttpImageService::new(ImageServiceConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..ImageServiceConfig::default()
        })
        .unwrap();

        let doc = ImageUpload::new("notes.pdf", "application/pdf", vec![1, 2, 3]);
        assert!(matches!(
            service.upload(doc).await,
            Err(ImageError::UnsupportedType(_))
        ));
    }

    #[tokio::test]
    async fn test_truncated_reply_body_is_a_transport_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            let complete = |req: &[u8]| {
                let text = String::from_utf8_lossy(req).to_lowercase();
                text.contains("--\r\n")
                    && (!text.contains("transfer-encoding: chunked") || text.ends_with("0\r\n\r\n"))
            };
            while !complete(&request) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            // Promise more bytes than are sent, then hang up.
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 200\r\n\r\n{\"success\"")
                .await
                .unwrap();
        });

        let service = HttpImageService::new(ImageServiceConfig {
            base_url: format!("http://{addr}"),
            ..ImageServiceConfig::default()
        })
        .unwrap();

        assert!(matches!(
            service.upload(upload(10)).await,
            Err(ImageError::Transport(_))
        ));
    }

    #[test]
    fn test_success_reply() {
        let body = r#"{"success":true,"url":"https://cdn.example/blog-images/a.jpg","filename":"a.jpg","size":1234,"originalName":"cover.png"}"#;
        let image = interpret_reply(200, body, &upload(10)).unwrap();

        assert_eq!(image.url, "https://cdn.example/blog-images/a.jpg");
        assert_eq!(image.filename, "a.jpg");
        assert_eq!(image.size, 1234);
        assert_eq!(image.original_name, "cover.png");
    }

    #[test]
    fn test_failure_flag_yields_no_url() {
        let body = r#"{"success":false,"error":"Only image files are allowed"}"#;
        match interpret_reply(200, body, &upload(10)) {
            Err(ImageError::Rejected(reason)) => assert_eq!(reason, "Only image files are allowed"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_non_2xx_is_rejected() {
        assert!(matches!(
            interpret_reply(500, "<html>oops</html>", &upload(10)),
            Err(ImageError::Rejected(reason)) if reason == "HTTP 500"
        ));
    }

    #[test]
    fn test_success_without_url_is_rejected() {
        let body = r#"{"success":true,"filename":"a.jpg"}"#;
        assert!(interpret_reply(200, body, &upload(10)).is_err());
    }

    #[test]
    fn test_endpoint_joins_path() {
        let config = ImageServiceConfig {
            base_url: "https://img.example/".to_string(),
            ..ImageServiceConfig::default()
        };
        assert_eq!(config.endpoint(), "https://img.example/api/upload-image");
    }
}
