// src/services/google.rs
use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::common::GoogleOAuthConfig;

/// Scopes requested on the consent screen
pub const GOOGLE_SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/userinfo.profile",
    "https://www.googleapis.com/auth/userinfo.email",
    "openid",
];

/// Issuer values Google puts in ID tokens
pub const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

#[derive(Debug, Error)]
pub enum GoogleError {
    #[error("OAuth flow failed: {0}")]
    OAuthFailed(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Token response did not include an id_token")]
    MissingIdToken,

    #[error("No signing key published for kid {0}")]
    UnknownSigningKey(String),

    #[error("Invalid ID token: {0}")]
    InvalidIdToken(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    pub token_type: String,
    pub scope: Option<String>,
}

/// Verified payload of a Google ID token
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleIdTokenClaims {
    pub sub: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    pub email_verified: Option<bool>,
}

/// The provider side of the login flow.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Consent-screen URL the browser is sent to.
    fn authorization_url(&self) -> String;

    /// Trades a one-time authorization code for provider tokens.
    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, GoogleError>;

    /// Checks signature, audience, issuer and expiry of an ID token.
    async fn verify_id_token(&self, id_token: &str) -> Result<GoogleIdTokenClaims, GoogleError>;
}

#[derive(Debug, Clone)]
pub struct GoogleService {
    config: GoogleOAuthConfig,
    client: Client,
}

impl GoogleService {
    pub fn new(config: GoogleOAuthConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    /// Fetch Google's current JWKS
    async fn fetch_signing_keys(&self) -> Result<JwkSet, GoogleError> {
        let response = self
            .client
            .get(&self.config.certs_endpoint)
            .send()
            .await
            .map_err(|e| GoogleError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, endpoint = %self.config.certs_endpoint, "Fetching Google signing keys failed");
            return Err(GoogleError::RequestFailed(format!(
                "HTTP {} from certs endpoint",
                status
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| GoogleError::SerializationError(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for GoogleService {
    fn authorization_url(&self) -> String {
        let scope_param = GOOGLE_SCOPES.join(" ");

        let auth_url = format!(
            "{}?access_type=offline&scope={}&prompt=consent&response_type=code&client_id={}&redirect_uri={}",
            self.config.auth_endpoint,
            urlencoding::encode(&scope_param),
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri)
        );

        debug!("Generated Google OAuth authorization URL with scopes: {}", scope_param);
        auth_url
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, GoogleError> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        debug!("Exchanging authorization code for tokens");

        let response = self
            .client
            .post(&self.config.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| GoogleError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Token exchange failed");
            return Err(GoogleError::OAuthFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let token_response = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| GoogleError::SerializationError(e.to_string()))?;

        info!(
            has_id_token = token_response.id_token.is_some(),
            has_refresh_token = token_response.refresh_token.is_some(),
            "Successfully exchanged authorization code for tokens"
        );
        Ok(token_response)
    }

    async fn verify_id_token(&self, id_token: &str) -> Result<GoogleIdTokenClaims, GoogleError> {
        let header =
            decode_header(id_token).map_err(|e| GoogleError::InvalidIdToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| GoogleError::InvalidIdToken("missing kid header".to_string()))?;

        let jwks = self.fetch_signing_keys().await?;
        let jwk = jwks.find(&kid).ok_or_else(|| {
            warn!(kid = %kid, "ID token signed with a key Google does not publish");
            GoogleError::UnknownSigningKey(kid.clone())
        })?;
        let key =
            DecodingKey::from_jwk(jwk).map_err(|e| GoogleError::InvalidIdToken(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.config.client_id]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        let data = decode::<GoogleIdTokenClaims>(id_token, &key, &validation).map_err(|e| {
            warn!(error = %e, "Google ID token validation failed");
            GoogleError::InvalidIdToken(e.to_string())
        })?;

        if data.claims.email_verified == Some(false) {
            warn!("Google ID token carries an unverified email address");
        }

        debug!(provider_id = %data.claims.sub, "Google ID token verified");
        Ok(data.claims)
    }
}
