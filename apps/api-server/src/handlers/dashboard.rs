use actix_web::{HttpResponse, web};

use quill_shared::ApiResponse;

use super::mapping;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/admin/dashboard
pub async fn stats(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let stats = state.dashboard.stats(&identity.actor()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::dashboard(stats))))
}
