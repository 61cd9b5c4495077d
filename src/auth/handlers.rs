//! Authentication handlers

use axum::{
    extract::{rejection::QueryRejection, Extension, Json, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::extractors::SessionUser;
use super::models::{
    AuthUrlResponse, CallbackParams, CallbackStage, IdentityClaims, SessionClaims,
};
use crate::common::{safe_email_log, AppState};
use crate::services::GoogleError;

/// GET /auth/google/url
/// Returns the Google consent-screen URL for the login button
///
/// # Response
/// ```json
/// { "url": "https://accounts.google.com/o/oauth2/v2/auth?..." }
/// ```
pub async fn google_auth_url(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<AuthUrlResponse> {
    let url = state.identity_provider.authorization_url();
    info!(url = %url, "Generated Google auth URL");
    Json(AuthUrlResponse { url })
}

/// GET /auth/google/callback
/// Exchanges the authorization code, verifies the ID token and hands a
/// session token to the frontend through a redirect.
///
/// Success: `<frontend>/login-success?token=<jwt>`
/// Failure: `<frontend>/login-error`
pub async fn google_oauth_callback(
    Extension(state): Extension<Arc<AppState>>,
    query: Result<Query<CallbackParams>, QueryRejection>,
) -> Response {
    let outcome = match query {
        Ok(Query(params)) => complete_login(&state, params).await,
        Err(rejection) => Err(CallbackFailure {
            stage: CallbackStage::Pending,
            reason: rejection.body_text(),
        }),
    };

    match outcome {
        Ok(token) => found(format!(
            "{}/login-success?token={}",
            state.frontend_url,
            urlencoding::encode(&token)
        )),
        Err(failure) => {
            error!(
                stage = %failure.stage,
                error = %failure.reason,
                "Authentication error"
            );
            found(format!("{}/login-error", state.frontend_url))
        }
    }
}

/// 302 Found to `location`
fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// GET /profile
/// Returns the claims of a valid session token
#[axum::debug_handler]
pub async fn profile_handler(SessionUser(claims): SessionUser) -> Json<SessionClaims> {
    Json(claims)
}

struct CallbackFailure {
    stage: CallbackStage,
    reason: String,
}

impl CallbackFailure {
    fn at(stage: CallbackStage) -> impl FnOnce(GoogleError) -> Self {
        move |e| Self {
            stage,
            reason: e.to_string(),
        }
    }
}

/// Runs the callback stages in order and returns the minted session token.
async fn complete_login(
    state: &AppState,
    params: CallbackParams,
) -> Result<String, CallbackFailure> {
    let mut stage = CallbackStage::Pending;

    if let Some(oauth_error) = params.error {
        return Err(CallbackFailure {
            stage,
            reason: format!("Google returned error: {}", oauth_error),
        });
    }
    let code = params.code.filter(|c| !c.is_empty()).ok_or(CallbackFailure {
        stage,
        reason: "no authorization code provided".to_string(),
    })?;

    stage = CallbackStage::Exchanging;
    debug!(stage = %stage, "Received OAuth callback with authorization code");
    let tokens = state
        .identity_provider
        .exchange_code(&code)
        .await
        .map_err(CallbackFailure::at(stage))?;

    stage = CallbackStage::Verifying;
    let id_token = tokens
        .id_token
        .ok_or(GoogleError::MissingIdToken)
        .map_err(CallbackFailure::at(stage))?;
    let identity: IdentityClaims = state
        .identity_provider
        .verify_id_token(&id_token)
        .await
        .map_err(CallbackFailure::at(stage))?
        .into();

    stage = CallbackStage::Issuing;
    let token = state
        .session_keys
        .issue(&identity)
        .map_err(|e| CallbackFailure {
            stage,
            reason: e.to_string(),
        })?;

    info!(
        user_id = %identity.id,
        email = %identity.email.as_deref().map(safe_email_log).unwrap_or_default(),
        provider = "google",
        "User authentication successful via Google OAuth"
    );
    Ok(token)
}
