// src/main.rs
use axum::{
    extract::Extension,
    http::{header, HeaderValue, Method},
    middleware, Router,
};
use dotenv::dotenv;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod logging_middleware;
mod services;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use auth::SessionKeys;
use common::{AppConfig, AppState};
use services::GoogleService;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = AppConfig::from_env()?;
    info!(
        frontend_url = %config.frontend_url,
        redirect_uri = %config.google.redirect_uri,
        "Configuration loaded"
    );

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let google_service = GoogleService::new(config.google.clone());
    info!("GoogleService initialized");

    let app_state = Arc::new(AppState {
        frontend_url: config.frontend_url.clone(),
        session_keys: Arc::new(SessionKeys::from_secret(&config.jwt_secret)),
        identity_provider: Arc::new(google_service),
    });

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let frontend_origin: HeaderValue = config.frontend_url.parse()?;
    let app = build_router(app_state, frontend_origin);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Backend running on http://localhost:{}", config.port);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Auth routes wrapped in logging, state, CORS and tracing layers
fn build_router(app_state: Arc<AppState>, frontend_origin: HeaderValue) -> Router {
    Router::new()
        .merge(auth::auth_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(app_state))
        .layer(
            CorsLayer::new()
                .allow_origin(frontend_origin)
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_credentials(true),
        )
        .layer(TraceLayer::new_for_http().make_span_with(logging_middleware::request_span))
}
