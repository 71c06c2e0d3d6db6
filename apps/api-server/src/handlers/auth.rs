//! Operator sign-in.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use quill_core::ports::{PasswordService, TokenService};
use quill_shared::ApiResponse;
use quill_shared::dto::{AuthResponse, LoginRequest, UserResponse};

use super::mapping;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let email = req.email.trim().to_lowercase();

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !password_service.verify(&req.password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "Failed sign-in attempt");
        return Err(AppError::Unauthorized);
    }

    let token = token_service
        .generate_token(user.id, &user.email, user.is_admin)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    tracing::info!(user_id = %user.id, is_admin = user.is_admin, "Operator signed in");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: u64::try_from(token_service.expiration_seconds()).unwrap_or(0),
    })))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user: UserResponse = match state.users.find_by_id(identity.user_id).await? {
        Some(user) => mapping::user(&user),
        None => return Err(AppError::Unauthorized),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}
