//! HTTP handlers and route configuration.

mod admin_posts;
mod auth;
mod categories;
mod comments;
mod dashboard;
mod health;
mod images;
mod mapping;
mod moderation;
mod posts;

use std::sync::Arc;

use actix_web::{guard, web};

use quill_core::domain::MAX_IMAGE_BYTES;
use quill_core::ports::RateLimiter;

use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimitMiddleware;

/// Malformed JSON bodies become problem documents instead of plain text.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// A malformed `{id}` segment is a 400, never a silent fallthrough.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Configure all application routes.
///
/// `comment_limiter` guards the public comment form only.
pub fn configure_routes(cfg: &mut web::ServiceConfig, comment_limiter: Arc<dyn RateLimiter>) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/categories", web::get().to(categories::list))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("/featured", web::get().to(posts::featured))
                    .route("/home", web::get().to(posts::home))
                    .service(
                        web::resource("/{id}/comments")
                            .guard(guard::Post())
                            .wrap(RateLimitMiddleware::new(comment_limiter))
                            .route(web::post().to(comments::submit)),
                    )
                    .route("/{id}/comments", web::get().to(comments::list))
                    .route("/{id}", web::get().to(posts::get)),
            )
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Admin routes
            .service(
                web::scope("/admin")
                    .route("/dashboard", web::get().to(dashboard::stats))
                    .service(
                        web::scope("/posts")
                            .route("", web::get().to(admin_posts::list))
                            .route("", web::post().to(admin_posts::create))
                            .route("/draft", web::post().to(admin_posts::create_draft))
                            .route("/publish", web::post().to(admin_posts::create_published))
                            .route("/{id}/draft", web::put().to(admin_posts::update_draft))
                            .route("/{id}/publish", web::put().to(admin_posts::update_published))
                            .route("/{id}", web::get().to(admin_posts::get))
                            .route("/{id}", web::put().to(admin_posts::update))
                            .route("/{id}", web::delete().to(admin_posts::delete)),
                    )
                    .service(
                        web::scope("/comments")
                            .route("", web::get().to(moderation::list))
                            .route("/bulk-approve", web::post().to(moderation::bulk_approve))
                            .route("/bulk-reject", web::post().to(moderation::bulk_reject))
                            .route("/{id}/approve", web::post().to(moderation::approve))
                            .route("/{id}", web::delete().to(moderation::reject)),
                    )
                    .service(
                        web::resource("/images")
                            // Let oversized files through to validation so they get a 413 body.
                            .app_data(web::PayloadConfig::new(MAX_IMAGE_BYTES * 2))
                            .route(web::post().to(images::upload)),
                    ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use quill_core::domain::{Actor, PostDraft, PostStatus};
    use quill_core::ports::{PasswordService, TokenService};
    use quill_infra::{
        Argon2PasswordService, HttpImageService, ImageServiceConfig, InMemoryRateLimiter,
        JwtConfig, JwtTokenService, RateLimitConfig,
    };
    use serde_json::{Value, json};
    use std::time::Duration;
    use uuid::Uuid;

    use crate::state::{AppState, ContentStores};

    fn state() -> AppState {
        let images = HttpImageService::new(ImageServiceConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..ImageServiceConfig::default()
        })
        .unwrap();
        AppState::from_parts(ContentStores::in_memory(), Arc::new(images))
    }

    fn tokens() -> Arc<dyn TokenService> {
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "handler-test-secret".to_string(),
            ..JwtConfig::default()
        }))
    }

    fn limiter(max_requests: u32) -> Arc<dyn RateLimiter> {
        Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
            max_requests,
            window: Duration::from_secs(60),
        }))
    }

    fn bearer(tokens: &Arc<dyn TokenService>, is_admin: bool) -> (&'static str, String) {
        let token = tokens
            .generate_token(Uuid::new_v4(), "ops@example.com", is_admin)
            .unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    async fn post_with_status(state: &AppState, status: PostStatus) -> Uuid {
        let draft = PostDraft {
            title: "Hello".to_string(),
            content: "<p>Body</p>".to_string(),
            status,
            ..PostDraft::default()
        };
        state
            .posts
            .create(&Actor::admin(Uuid::new_v4()), draft)
            .await
            .unwrap()
            .id
    }

    macro_rules! app {
        ($state:expr, $tokens:expr, $limiter:expr) => {{
            let limiter = $limiter;
            let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .app_data(web::Data::new($tokens.clone()))
                    .app_data(web::Data::new(passwords))
                    .app_data(json_config())
                    .app_data(query_config())
                    .app_data(path_config())
                    .configure(move |cfg| configure_routes(cfg, limiter)),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_submitted_comment_is_pending_even_if_body_says_approved() {
        let state = state();
        let tokens = tokens();
        let post_id = post_with_status(&state, PostStatus::Published).await;
        let app = app!(state, tokens, limiter(5));

        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{post_id}/comments"))
            .set_json(json!({"author_name": "Ada", "content": "Nice", "approved": true}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["approved"], json!(false));

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{post_id}/comments"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], json!([]));
    }

    #[actix_web::test]
    async fn test_draft_is_not_found_publicly() {
        let state = state();
        let tokens = tokens();
        let post_id = post_with_status(&state, PostStatus::Draft).await;
        let app = app!(state, tokens, limiter(5));

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{post_id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{post_id}/comments"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri(&format!("/api/admin/posts/{post_id}"))
            .insert_header(bearer(&tokens, true))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_malformed_id_on_draft_or_publish_writes_nothing() {
        let state = state();
        let tokens = tokens();
        let app = app!(state, tokens, limiter(5));

        for action in ["draft", "publish"] {
            let req = test::TestRequest::put()
                .uri(&format!("/api/admin/posts/not-a-uuid/{action}"))
                .insert_header(bearer(&tokens, true))
                .set_json(json!({"title": "T", "content": "C"}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }

        let posts = state
            .posts
            .list_all(&Actor::admin(Uuid::new_v4()))
            .await
            .unwrap();
        assert!(posts.is_empty());
    }

    #[actix_web::test]
    async fn test_update_draft_keeps_the_same_post() {
        let state = state();
        let tokens = tokens();
        let post_id = post_with_status(&state, PostStatus::Published).await;
        let app = app!(state, tokens, limiter(5));

        let req = test::TestRequest::put()
            .uri(&format!("/api/admin/posts/{post_id}/draft"))
            .insert_header(bearer(&tokens, true))
            .set_json(json!({"title": "Pulled", "content": "C", "status": "published"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["id"], json!(post_id));
        assert_eq!(body["data"]["status"], json!("draft"));

        let posts = state
            .posts
            .list_all(&Actor::admin(Uuid::new_v4()))
            .await
            .unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[actix_web::test]
    async fn test_admin_routes_require_admin_token() {
        let state = state();
        let tokens = tokens();
        let app = app!(state, tokens, limiter(5));

        let req = test::TestRequest::get()
            .uri("/api/admin/dashboard")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/admin/dashboard")
            .insert_header(bearer(&tokens, false))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/admin/posts")
            .insert_header(bearer(&tokens, false))
            .set_json(json!({"title": "T", "content": "C"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_publish_then_public_listing() {
        let state = state();
        let tokens = tokens();
        let app = app!(state, tokens, limiter(5));

        let req = test::TestRequest::post()
            .uri("/api/admin/posts/publish")
            .insert_header(bearer(&tokens, true))
            .set_json(json!({"title": " Launch ", "content": "<p>x</p>", "tags": "a, b,,"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["status"], json!("published"));
        assert_eq!(body["data"]["title"], json!("Launch"));
        assert_eq!(body["data"]["tags"], json!(["a", "b"]));

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn test_invalid_post_type_is_bad_request() {
        let state = state();
        let tokens = tokens();
        let app = app!(state, tokens, limiter(5));

        let req = test::TestRequest::get()
            .uri("/api/posts?type=podcast")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_oversized_image_is_rejected_before_upload() {
        let state = state();
        let tokens = tokens();
        let app = app!(state, tokens, limiter(5));

        let req = test::TestRequest::post()
            .uri("/api/admin/images?filename=big.png")
            .insert_header(bearer(&tokens, true))
            .insert_header(("Content-Type", "image/png"))
            .set_payload(vec![0u8; 6 * 1024 * 1024])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let req = test::TestRequest::post()
            .uri("/api/admin/images?filename=doc.pdf")
            .insert_header(bearer(&tokens, true))
            .insert_header(("Content-Type", "application/pdf"))
            .set_payload(vec![1u8; 16])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[actix_web::test]
    async fn test_comment_form_is_rate_limited() {
        let state = state();
        let tokens = tokens();
        let post_id = post_with_status(&state, PostStatus::Published).await;
        let app = app!(state, tokens, limiter(1));

        let submit = || {
            test::TestRequest::post()
                .uri(&format!("/api/posts/{post_id}/comments"))
                .peer_addr("203.0.113.7:4000".parse().unwrap())
                .set_json(json!({"author_name": "Ada", "content": "Hi"}))
                .to_request()
        };

        let resp = test::call_service(&app, submit()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = test::call_service(&app, submit()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key("retry-after"));

        // A forged forwarding header does not buy a fresh allowance.
        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{post_id}/comments"))
            .peer_addr("203.0.113.7:4001".parse().unwrap())
            .insert_header(("X-Forwarded-For", "198.51.100.23"))
            .set_json(json!({"author_name": "Ada", "content": "Hi again"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

        // Reading comments is not limited.
        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{post_id}/comments"))
            .peer_addr("203.0.113.7:4000".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
