//! Terminal client for the Google login demo.
//!
//! Fetches the login URL from the auth service, captures the session token
//! from the success redirect, keeps it in a local file and decodes it to show
//! the signed-in profile.

pub mod api;
pub mod capture;
pub mod config;
pub mod session;
pub mod store;
pub mod views;

pub use api::{BackendClient, ProfileResponse};
pub use capture::{wait_for_login, LoginOutcome};
pub use config::ClientConfig;
pub use session::{decode_unverified, restore_session, Profile};
pub use store::TokenStore;
pub use views::HomeView;
