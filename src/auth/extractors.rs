//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::models::SessionClaims;
use crate::common::{safe_token_log, ApiError, AppState};

/// Caller holding a valid session token
///
/// Rejects with a plain-text 401 when the `Authorization` header is absent
/// or its token fails signature or expiry checks.
#[derive(Debug)]
pub struct SessionUser(pub SessionClaims);

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let header = match parts.headers.get(AUTHORIZATION) {
            Some(h) => h,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("Unauthorized".into()));
            }
        };

        let token = match header.to_str().ok().and_then(bearer_token) {
            Some(t) => t,
            None => {
                warn!("Authentication failed: Authorization header carries no token");
                return Err(ApiError::Unauthorized("Invalid token".into()));
            }
        };

        match app_state.session_keys.verify(token) {
            Ok(claims) => {
                debug!(
                    user_id = %claims.identity.id,
                    token = %safe_token_log(token),
                    "Session token accepted"
                );
                Ok(SessionUser(claims))
            }
            Err(e) => {
                warn!(error = %e, token = %safe_token_log(token), "Session token validation failed");
                Err(ApiError::Unauthorized("Invalid token".into()))
            }
        }
    }
}

/// Second space-separated segment of an `Authorization` value.
pub fn bearer_token(value: &str) -> Option<&str> {
    value.split(' ').nth(1).filter(|t| !t.is_empty())
}
