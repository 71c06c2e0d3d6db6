//! Admin comment moderation.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::ModerationFilter;
use quill_shared::ApiResponse;
use quill_shared::dto::{BulkIdsRequest, ModerationQuery};

use super::mapping;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/admin/comments?filter=all|pending|approved
pub async fn list(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<ModerationQuery>,
) -> AppResult<HttpResponse> {
    let filter: ModerationFilter = match query.into_inner().filter {
        Some(f) => f.parse()?,
        None => ModerationFilter::default(),
    };
    let comments: Vec<_> = state
        .comments
        .list_for_moderation(&identity.actor(), filter)
        .await?
        .into_iter()
        .map(mapping::moderation_comment)
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(comments)))
}

/// POST /api/admin/comments/{id}/approve
pub async fn approve(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .comments
        .approve(&identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Comment approved")))
}

/// DELETE /api/admin/comments/{id}
pub async fn reject(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .comments
        .reject(&identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Comment deleted")))
}

/// POST /api/admin/comments/bulk-approve
pub async fn bulk_approve(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<BulkIdsRequest>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .comments
        .bulk_approve(&identity.actor(), body.into_inner().ids)
        .await?;
    Ok(bulk_response(outcome, "approved"))
}

/// POST /api/admin/comments/bulk-reject
pub async fn bulk_reject(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<BulkIdsRequest>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .comments
        .bulk_reject(&identity.actor(), body.into_inner().ids)
        .await?;
    Ok(bulk_response(outcome, "deleted"))
}

/// 200 either way: entries already applied stay applied, so a partial
/// outcome is reported with `success: false` and the per-id failures.
fn bulk_response(outcome: quill_core::services::BulkOutcome, verb: &str) -> HttpResponse {
    let total = outcome.applied.len() + outcome.failed.len();
    let body = if outcome.is_complete() {
        let message = format!("{} comment(s) {}", outcome.applied.len(), verb);
        ApiResponse::ok_with_message(mapping::bulk_outcome(outcome), message)
    } else {
        let message = format!(
            "{} of {} comment(s) {}, {} failed",
            outcome.applied.len(),
            total,
            verb,
            outcome.failed.len()
        );
        ApiResponse::partial(mapping::bulk_outcome(outcome), message)
    };
    HttpResponse::Ok().json(body)
}
