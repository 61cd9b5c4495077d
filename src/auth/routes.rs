//! Authentication routes

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /auth/google/url` - Google consent-screen URL
/// - `GET /auth/google/callback` - OAuth callback, redirects to the frontend
/// - `GET /profile` - Claims of the bearer's session token
pub fn auth_routes() -> Router {
    Router::new()
        .route("/auth/google/url", get(handlers::google_auth_url))
        .route("/auth/google/callback", get(handlers::google_oauth_callback))
        .route("/profile", get(handlers::profile_handler))
}
