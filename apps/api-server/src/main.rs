//! # Quill API Server
//!
//! Actix-web HTTP server for the Quill content platform: the public read
//! path, the comment form, and the admin authoring/moderation surface.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use quill_core::ports::{PasswordService, RateLimiter, TokenService};
use quill_infra::{Argon2PasswordService, InMemoryRateLimiter, JwtTokenService};

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    tracing::info!(
        "Starting Quill API Server on {}:{}",
        config.host,
        config.port
    );

    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
    let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
    let comment_limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::from_env());

    let state = AppState::new(&config)
        .await
        .context("failed to build application state")?;

    match &config.admin {
        Some(admin) => state::bootstrap_admin(&state, password_service.as_ref(), admin)
            .await
            .context("failed to bootstrap the admin account")?,
        None => tracing::warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set, no admin account bootstrapped"),
    }

    HttpServer::new(move || {
        let limiter = comment_limiter.clone();
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .app_data(web::Data::new(password_service.clone()))
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            .app_data(handlers::path_config())
            .configure(move |cfg| handlers::configure_routes(cfg, limiter))
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?
    .run()
    .await?;

    Ok(())
}
