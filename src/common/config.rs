// src/common/config.rs
//! Environment configuration for the auth service

use std::env;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const GOOGLE_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_CERTS_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v3/certs";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Google OAuth client settings
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_endpoint: String,
    pub token_endpoint: String,
    pub certs_endpoint: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub frontend_url: String,
    pub google: GoogleOAuthConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &str, default: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port = match lookup("PORT").filter(|p| !p.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid {
                    name: "PORT",
                    value: raw,
                })?,
            None => DEFAULT_PORT,
        };

        let frontend_url = required("FRONTEND_URL")?.trim_end_matches('/').to_string();

        Ok(Self {
            port,
            jwt_secret: required("JWT_SECRET")?,
            frontend_url,
            google: GoogleOAuthConfig {
                client_id: required("GOOGLE_CLIENT_ID")?,
                client_secret: required("GOOGLE_CLIENT_SECRET")?,
                redirect_uri: required("GOOGLE_REDIRECT_URI")?,
                auth_endpoint: optional("GOOGLE_AUTH_ENDPOINT", GOOGLE_AUTH_ENDPOINT),
                token_endpoint: optional("GOOGLE_TOKEN_ENDPOINT", GOOGLE_TOKEN_ENDPOINT),
                certs_endpoint: optional("GOOGLE_CERTS_ENDPOINT", GOOGLE_CERTS_ENDPOINT),
            },
        })
    }
}
