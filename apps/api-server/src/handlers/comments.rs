//! Public comment endpoints.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::CommentSubmission;
use quill_shared::ApiResponse;
use quill_shared::dto::SubmitCommentRequest;

use super::mapping;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts/{id}/comments
pub async fn list(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let comments: Vec<_> = state
        .comments
        .list_approved_for_post(path.into_inner())
        .await?
        .into_iter()
        .map(mapping::comment)
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(comments)))
}

/// POST /api/posts/{id}/comments
///
/// The new comment is held for moderation and not shown until approved.
pub async fn submit(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<SubmitCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let comment = state
        .comments
        .submit(CommentSubmission {
            post_id: path.into_inner(),
            author_name: req.author_name,
            author_email: req.author_email,
            content: req.content,
        })
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        mapping::comment(comment),
        "Comment submitted! It will appear after moderation.",
    )))
}
