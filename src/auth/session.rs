//! Session token signing and verification

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use super::models::{IdentityClaims, SessionClaims};

/// Lifetime of an issued session token
pub const SESSION_TTL_HOURS: i64 = 1;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to sign session token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("session token rejected: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

/// HS256 keys derived once from `JWT_SECRET`
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionKeys {
    pub fn from_secret(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, identity: &IdentityClaims) -> Result<String, SessionError> {
        self.issue_at(identity, Utc::now())
    }

    pub fn issue_at(
        &self,
        identity: &IdentityClaims,
        issued_at: DateTime<Utc>,
    ) -> Result<String, SessionError> {
        let claims = SessionClaims {
            identity: identity.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::hours(SESSION_TTL_HOURS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(SessionError::Signing)
    }

    /// Signature and expiry only; no issuer or audience is pinned.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(SessionError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> IdentityClaims {
        IdentityClaims {
            id: "109876543210".to_string(),
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            picture: Some("https://lh3.googleusercontent.com/a/jane".to_string()),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let keys = SessionKeys::from_secret("test_secret_key");
        let token = keys.issue(&jane()).expect("Failed to issue token");

        let claims = keys.verify(&token).expect("Failed to verify token");
        assert_eq!(claims.identity, jane());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = SessionKeys::from_secret("test_secret_key");
        let token = keys
            .issue_at(&jane(), Utc::now() - Duration::minutes(61))
            .expect("Failed to issue token");

        assert!(matches!(keys.verify(&token), Err(SessionError::Invalid(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = SessionKeys::from_secret("test_secret_key")
            .issue(&jane())
            .expect("Failed to issue token");

        let result = SessionKeys::from_secret("wrong_secret_key").verify(&token);
        assert!(
            result.is_err(),
            "Token validation should fail with wrong secret"
        );
    }

    #[test]
    fn test_missing_claims_are_omitted_from_payload() {
        let keys = SessionKeys::from_secret("test_secret_key");
        let identity = IdentityClaims {
            id: "42".to_string(),
            name: None,
            email: Some("nobody@example.com".to_string()),
            picture: None,
        };
        let token = keys.issue(&identity).expect("Failed to issue token");

        let claims = keys.verify(&token).expect("Failed to verify token");
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["id"], "42");
        assert!(json.get("name").is_none());
        assert!(json.get("picture").is_none());
        assert_eq!(claims.identity, identity);
    }
}
