//! HTTP client for the auth service.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("auth service answered {status}: {body}")]
    Unexpected { status: StatusCode, body: String },
}

#[derive(Debug, Deserialize)]
struct AuthUrlResponse {
    url: String,
}

/// Outcome of a call to the protected `/profile` endpoint
#[derive(Debug, PartialEq)]
pub enum ProfileResponse {
    /// Claims the server verified
    Verified(serde_json::Value),
    /// 401 with the server's plain-text reason
    Rejected(String),
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// GET /auth/google/url
    pub async fn auth_url(&self) -> Result<String, ApiClientError> {
        let response = self
            .http
            .get(format!("{}/auth/google/url", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiClientError::Unexpected { status, body });
        }

        let body = response.json::<AuthUrlResponse>().await?;
        debug!(url = %body.url, "Fetched Google auth URL");
        Ok(body.url)
    }

    /// GET /profile with the session token as bearer credential
    pub async fn profile(&self, token: &str) -> Result<ProfileResponse, ApiClientError> {
        let response = self
            .http
            .get(format!("{}/profile", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(ProfileResponse::Verified(response.json().await?)),
            StatusCode::UNAUTHORIZED => Ok(ProfileResponse::Rejected(response.text().await?)),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiClientError::Unexpected { status, body })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_auth_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/google/url"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "url": "https://accounts.google.com/o/oauth2/v2/auth?prompt=consent"
            })))
            .mount(&server)
            .await;

        let client = BackendClient::new(&format!("{}/", server.uri()));
        let url = client.auth_url().await.unwrap();
        assert!(url.contains("prompt=consent"));
    }

    #[tokio::test]
    async fn test_auth_url_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/google/url"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = BackendClient::new(&server.uri()).auth_url().await.unwrap_err();
        assert!(matches!(
            err,
            ApiClientError::Unexpected { status, .. } if status == StatusCode::BAD_GATEWAY
        ));
    }

    #[tokio::test]
    async fn test_profile_verified_and_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile"))
            .and(header("authorization", "Bearer good"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "42" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/profile"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid token"))
            .mount(&server)
            .await;

        let client = BackendClient::new(&server.uri());
        assert_eq!(
            client.profile("good").await.unwrap(),
            ProfileResponse::Verified(serde_json::json!({ "id": "42" }))
        );
        assert_eq!(
            client.profile("stale").await.unwrap(),
            ProfileResponse::Rejected("Invalid token".to_string())
        );
    }
}
