//! Admin image upload, forwarded to the Image Service.

use actix_web::{HttpRequest, HttpResponse, http::header, web};

use quill_core::domain::ImageUpload;
use quill_shared::ApiResponse;
use quill_shared::dto::ImageUploadQuery;

use super::mapping;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/admin/images?filename=<name>&resize=<bool>
///
/// The raw request body is the image; its `Content-Type` is the image type.
pub async fn upload(
    state: web::Data<AppState>,
    identity: Identity,
    req: HttpRequest,
    query: web::Query<ImageUploadQuery>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    identity.actor().require_admin()?;

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_lowercase())
        .unwrap_or_default();
    let query = query.into_inner();
    let filename = query
        .filename
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| "upload".to_string());

    let mut upload = ImageUpload::new(filename, content_type, body.to_vec());
    // Empty folder: the Image Service client applies its configured default.
    upload.folder = query.folder.unwrap_or_default();
    upload.resize = query.resize.unwrap_or(true);

    let image = state.images.upload(upload).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(mapping::uploaded_image(image))))
}
