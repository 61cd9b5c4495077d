//! Loopback listener for the frontend routes.
//!
//! The auth service redirects the browser to `<frontend>/login-success` or
//! `<frontend>/login-error`. During `login` this module binds the frontend
//! origin and serves those routes plus `/` until the flow ends.

use std::time::Duration;

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::session::restore_session;
use crate::store::TokenStore;

/// How long `login` waits for the browser to come back
pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Time left for the browser to follow the redirect to `/`
const HOME_GRACE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Token received and stored
    TokenStored,
    /// `/login-success` was hit without a token
    NoToken,
    /// Token received but could not be written
    StoreFailed,
    /// The auth service sent the browser to `/login-error`
    ProviderError,
    TimedOut,
}

enum CaptureEvent {
    Finished(LoginOutcome),
    HomeServed,
}

#[derive(Clone)]
struct CaptureState {
    store: TokenStore,
    events: mpsc::UnboundedSender<CaptureEvent>,
}

#[derive(Deserialize)]
struct SuccessParams {
    token: Option<String>,
}

fn capture_routes(state: CaptureState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/login-success", get(login_success))
        .route("/login-error", get(login_error))
        .with_state(state)
}

async fn login_success(
    State(state): State<CaptureState>,
    Query(params): Query<SuccessParams>,
) -> Redirect {
    let outcome = match params.token.filter(|t| !t.is_empty()) {
        Some(token) => match state.store.save(&token) {
            Ok(()) => {
                info!(path = %state.store.path().display(), "Session token stored");
                LoginOutcome::TokenStored
            }
            Err(e) => {
                error!(error = %e, "Token handling error");
                LoginOutcome::StoreFailed
            }
        },
        None => {
            warn!("Login redirect arrived without a token");
            LoginOutcome::NoToken
        }
    };

    let _ = state.events.send(CaptureEvent::Finished(outcome));
    Redirect::to("/")
}

async fn login_error(State(state): State<CaptureState>) -> &'static str {
    let _ = state.events.send(CaptureEvent::Finished(LoginOutcome::ProviderError));
    "Error Login"
}

async fn home(State(state): State<CaptureState>) -> String {
    let page = match restore_session(&state.store) {
        Some(profile) => format!(
            "Welcome, {}!\nYou can close this window and return to the terminal.",
            profile.name.as_deref().unwrap_or("")
        ),
        None => "Processing login...\nReturn to the terminal.".to_string(),
    };
    let _ = state.events.send(CaptureEvent::HomeServed);
    page
}

/// Serves the frontend routes on `listener` until the login flow finishes.
pub async fn wait_for_login(
    listener: TcpListener,
    store: TokenStore,
    timeout: Duration,
) -> anyhow::Result<LoginOutcome> {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = capture_routes(CaptureState {
        store,
        events: events_tx,
    });

    debug!(addr = ?listener.local_addr().ok(), "Waiting for login redirect");
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    let outcome = tokio::time::timeout(timeout, async {
        loop {
            match events_rx.recv().await {
                Some(CaptureEvent::Finished(outcome)) => break outcome,
                Some(CaptureEvent::HomeServed) => continue,
                None => break LoginOutcome::TimedOut,
            }
        }
    })
    .await
    .unwrap_or(LoginOutcome::TimedOut);

    // Success paths redirect to `/`; let the browser land there first.
    if !matches!(outcome, LoginOutcome::ProviderError | LoginOutcome::TimedOut) {
        let _ = tokio::time::timeout(HOME_GRACE, async {
            while let Some(event) = events_rx.recv().await {
                if matches!(event, CaptureEvent::HomeServed) {
                    break;
                }
            }
        })
        .await;
    }

    let _ = shutdown_tx.send(());
    server.await??;

    Ok(outcome)
}
