//! Terminal rendering of the home screen.

use std::fmt;

use crate::session::Profile;

/// What the home screen shows after loading
#[derive(Debug, PartialEq)]
pub enum HomeView {
    /// The login URL is not available yet
    Loading,
    LoggedOut { auth_url: String },
    LoggedIn { profile: Profile },
}

impl HomeView {
    /// The login URL gates everything, even an existing session.
    pub fn resolve(profile: Option<Profile>, auth_url: Option<String>) -> Self {
        match (auth_url, profile) {
            (None, _) => HomeView::Loading,
            (Some(_), Some(profile)) => HomeView::LoggedIn { profile },
            (Some(auth_url), None) => HomeView::LoggedOut { auth_url },
        }
    }
}

impl fmt::Display for HomeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HomeView::Loading => writeln!(f, "Loading..."),
            HomeView::LoggedOut { auth_url } => {
                writeln!(f, "Google Login Demo")?;
                writeln!(f)?;
                writeln!(f, "Login with Google:")?;
                writeln!(f, "  {}", auth_url)?;
                writeln!(f)?;
                writeln!(f, "Run `login-client login` to sign in.")
            }
            HomeView::LoggedIn { profile } => {
                let name = profile.name.as_deref().unwrap_or("");
                writeln!(f, "Welcome, {}!", name)?;
                if let Some(picture) = &profile.picture {
                    writeln!(f, "Picture: {}", picture)?;
                }
                writeln!(f, "Email: {}", profile.email.as_deref().unwrap_or(""))?;
                writeln!(f)?;
                writeln!(f, "Run `login-client logout` to sign out.")
            }
        }
    }
}
