//! Public read path. Only published posts are ever returned here.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::ApiResponse;
use quill_shared::dto::{LimitQuery, PostListQuery};

use super::mapping;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let query = mapping::post_query(query.into_inner())?;
    let posts = state.posts.list_published(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::posts(posts))))
}

/// GET /api/posts/featured
pub async fn featured(
    state: web::Data<AppState>,
    query: web::Query<LimitQuery>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list_featured(query.limit).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::posts(posts))))
}

/// GET /api/posts/home
pub async fn home(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let feed = state.posts.home_feed().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::home_feed(feed))))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.posts.get_public(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::post_with_category(post))))
}
