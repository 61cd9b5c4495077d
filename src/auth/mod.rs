//! # Auth Module
//!
//! Google OAuth login and stateless session tokens:
//! - Consent-screen URL generation
//! - Callback handling (code exchange, ID token verification, token minting)
//! - SessionUser extractor for protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod session;


pub use routes::auth_routes;
pub use session::SessionKeys;
