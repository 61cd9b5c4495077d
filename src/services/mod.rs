// src/services/mod.rs
//
// Outbound integrations used by the auth handlers

pub mod google;

// Re-export commonly used types for convenience
pub use google::{GoogleError, GoogleIdTokenClaims, GoogleService, IdentityProvider};
