//! Authentication data models

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::services::GoogleIdTokenClaims;

/// User attributes taken from a verified Google ID token
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IdentityClaims {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl From<GoogleIdTokenClaims> for IdentityClaims {
    fn from(claims: GoogleIdTokenClaims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
            picture: claims.picture,
        }
    }
}

/// Session token payload
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub identity: IdentityClaims,
    pub iat: i64,
    pub exp: i64,
}

/// Response body of `GET /auth/google/url`
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthUrlResponse {
    pub url: String,
}

/// Query string Google sends back to the callback
#[derive(Deserialize, Debug, Default)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Position of a callback request in the login flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackStage {
    Pending,
    Exchanging,
    Verifying,
    Issuing,
}

impl fmt::Display for CallbackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallbackStage::Pending => "pending",
            CallbackStage::Exchanging => "exchanging",
            CallbackStage::Verifying => "verifying",
            CallbackStage::Issuing => "issuing",
        };
        f.write_str(name)
    }
}
