//! Client configuration.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
pub const DEFAULT_TOKEN_PATH: &str = "./.login-client/token";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_url: String,
    /// Origin the auth service redirects back to
    pub frontend_url: Url,
    pub token_path: PathBuf,
}

impl ClientConfig {
    pub fn new(backend_url: &str, frontend_url: &str, token_path: PathBuf) -> Result<Self> {
        let frontend_url = Url::parse(frontend_url)
            .with_context(|| format!("Invalid frontend URL: {}", frontend_url))?;

        Ok(Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            frontend_url,
            token_path,
        })
    }

    /// `host:port` the loopback listener binds.
    pub fn listen_authority(&self) -> Result<String> {
        let host = self
            .frontend_url
            .host_str()
            .ok_or_else(|| anyhow!("Frontend URL has no host: {}", self.frontend_url))?;
        let port = self
            .frontend_url
            .port_or_known_default()
            .ok_or_else(|| anyhow!("Frontend URL has no port: {}", self.frontend_url))?;
        Ok(format!("{}:{}", host, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_authority() {
        let config = ClientConfig::new(
            "http://localhost:8080/",
            DEFAULT_FRONTEND_URL,
            PathBuf::from(DEFAULT_TOKEN_PATH),
        )
        .unwrap();

        assert_eq!(config.backend_url, "http://localhost:8080");
        assert_eq!(config.listen_authority().unwrap(), "localhost:5173");
    }

    #[test]
    fn test_default_port_from_scheme() {
        let config =
            ClientConfig::new(DEFAULT_BACKEND_URL, "http://127.0.0.1", PathBuf::from("t")).unwrap();
        assert_eq!(config.listen_authority().unwrap(), "127.0.0.1:80");
    }

    #[test]
    fn test_invalid_frontend_url() {
        assert!(ClientConfig::new(DEFAULT_BACKEND_URL, "not a url", PathBuf::from("t")).is_err());
    }
}
