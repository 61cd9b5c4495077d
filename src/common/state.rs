// Application state shared across all modules

use std::sync::Arc;

use crate::auth::session::SessionKeys;
use crate::services::IdentityProvider;

/// Read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    /// Client origin without trailing slash, target of the callback redirects
    pub frontend_url: String,
    pub session_keys: Arc<SessionKeys>,
    pub identity_provider: Arc<dyn IdentityProvider>,
}
