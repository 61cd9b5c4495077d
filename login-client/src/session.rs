//! Restoring the signed-in profile from the stored token.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::store::TokenStore;

#[derive(Debug, Error)]
#[error("malformed session token: {0}")]
pub struct DecodeError(#[from] jsonwebtoken::errors::Error);

/// Profile fields carried in the session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Reads the token payload without checking signature or expiry.
///
/// The client never holds the signing secret; the auth service stays the
/// only party that can vouch for a token.
pub fn decode_unverified(token: &str) -> Result<Profile, DecodeError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<Profile>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// Loads and decodes the stored token.
///
/// A token that cannot be decoded is removed and treated as no session.
pub fn restore_session(store: &TokenStore) -> Option<Profile> {
    let token = match store.load() {
        Ok(Some(token)) => token,
        Ok(None) => return None,
        Err(e) => {
            error!(error = %e, "Session restore error");
            return None;
        }
    };

    match decode_unverified(&token) {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!(error = %e, "Session restore error");
            if let Err(e) = store.clear() {
                error!(error = %e, "Failed to discard malformed token");
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn signed_token(payload: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(b"server_side_secret"),
        )
        .expect("Failed to encode token")
    }

    #[test]
    fn test_decode_without_secret() {
        let token = signed_token(serde_json::json!({
            "id": "109876543210",
            "name": "Jane Doe",
            "email": "jane@example.com",
            "picture": "https://lh3.googleusercontent.com/a/jane",
            "iat": 1_700_000_000,
            "exp": 1_700_003_600,
        }));

        let profile = decode_unverified(&token).expect("token decodes");
        assert_eq!(profile.id, "109876543210");
        assert_eq!(profile.name.as_deref(), Some("Jane Doe"));
        assert_eq!(profile.email.as_deref(), Some("jane@example.com"));
        assert_eq!(profile.exp, Some(1_700_003_600));
    }

    #[test]
    fn test_decode_accepts_payload_without_id() {
        let profile = decode_unverified(&signed_token(serde_json::json!({ "name": "Jane Doe" })))
            .expect("token decodes");
        assert_eq!(profile.id, "");
        assert_eq!(profile.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_unverified("definitely-not-a-jwt").is_err());
    }

    #[test]
    fn test_restore_session_discards_malformed_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token"));
        store.save("garbage").unwrap();

        assert_eq!(restore_session(&store), None);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_restore_session_with_valid_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token"));
        store
            .save(&signed_token(serde_json::json!({ "id": "42", "exp": 1 })))
            .unwrap();

        let profile = restore_session(&store).expect("session restored");
        assert_eq!(profile.id, "42");
        assert_eq!(profile.name, None);
    }
}
