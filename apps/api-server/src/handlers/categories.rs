use actix_web::{HttpResponse, web};

use quill_shared::ApiResponse;

use super::mapping;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories: Vec<_> = state
        .categories
        .list_all()
        .await?
        .into_iter()
        .map(mapping::category)
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(categories)))
}
