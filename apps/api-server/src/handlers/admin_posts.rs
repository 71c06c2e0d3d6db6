//! Admin post authoring: CRUD plus the editor's save-draft/publish actions.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::ApiResponse;
use quill_shared::dto::PostRequest;

use super::mapping;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/admin/posts
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.posts.list_all(&identity.actor()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::posts(posts))))
}

/// GET /api/admin/posts/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .get_for_admin(&identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::post_with_category(post))))
}

/// POST /api/admin/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let draft = mapping::post_draft(body.into_inner())?;
    let post = state.posts.create(&identity.actor(), draft).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(mapping::post(post, None))))
}

/// PUT /api/admin/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let draft = mapping::post_draft(body.into_inner())?;
    let post = state
        .posts
        .update(&identity.actor(), path.into_inner(), draft)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::post(post, None))))
}

/// DELETE /api/admin/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(&identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Post deleted")))
}

/// POST /api/admin/posts/draft
pub async fn create_draft(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    save_draft(state, identity, None, body).await
}

/// PUT /api/admin/posts/{id}/draft
pub async fn update_draft(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    save_draft(state, identity, Some(path.into_inner()), body).await
}

/// POST /api/admin/posts/publish
pub async fn create_published(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    publish(state, identity, None, body).await
}

/// PUT /api/admin/posts/{id}/publish
pub async fn update_published(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    publish(state, identity, Some(path.into_inner()), body).await
}

async fn save_draft(
    state: web::Data<AppState>,
    identity: Identity,
    id: Option<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let draft = mapping::post_draft(body.into_inner())?;
    let post = state
        .posts
        .save_as_draft(&identity.actor(), id, draft)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        mapping::post(post, None),
        "Draft saved",
    )))
}

async fn publish(
    state: web::Data<AppState>,
    identity: Identity,
    id: Option<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let draft = mapping::post_draft(body.into_inner())?;
    let post = state.posts.publish(&identity.actor(), id, draft).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        mapping::post(post, None),
        "Post published",
    )))
}
