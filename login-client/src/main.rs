//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use login_client::capture::LOGIN_TIMEOUT;
use login_client::config::{DEFAULT_BACKEND_URL, DEFAULT_FRONTEND_URL, DEFAULT_TOKEN_PATH};
use login_client::{
    restore_session, wait_for_login, BackendClient, ClientConfig, HomeView, LoginOutcome,
    ProfileResponse, TokenStore,
};

#[derive(Parser)]
#[command(name = "login-client")]
#[command(version = "0.1")]
#[command(about = "Google login demo client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Auth service base URL
    #[arg(long, env = "BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    backend_url: String,

    /// Origin the auth service redirects back to
    #[arg(long, env = "FRONTEND_URL", default_value = DEFAULT_FRONTEND_URL)]
    frontend_url: String,

    /// Where the session token is kept
    #[arg(long, env = "LOGIN_CLIENT_TOKEN_PATH", default_value = DEFAULT_TOKEN_PATH)]
    token_path: PathBuf,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show the signed-in profile or the login link (default)
    Status,
    /// Sign in with Google
    Login {
        /// Print the URL instead of opening a browser
        #[arg(long)]
        no_browser: bool,
    },
    /// Forget the stored session token
    Logout,
    /// Ask the auth service to verify the stored token
    Profile,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::new(&cli.backend_url, &cli.frontend_url, cli.token_path)?;
    let store = TokenStore::new(config.token_path.clone());
    let backend = BackendClient::new(&config.backend_url);

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => status(&store, &backend).await,
        Commands::Login { no_browser } => login(&config, &store, &backend, no_browser).await,
        Commands::Logout => logout(&store),
        Commands::Profile => profile(&store, &backend).await,
    }
}

async fn status(store: &TokenStore, backend: &BackendClient) -> Result<()> {
    let profile = restore_session(store);
    let auth_url = match backend.auth_url().await {
        Ok(url) => Some(url),
        Err(e) => {
            error!(error = %e, "Error getting Google URL");
            None
        }
    };

    print!("{}", HomeView::resolve(profile, auth_url));
    Ok(())
}

async fn login(
    config: &ClientConfig,
    store: &TokenStore,
    backend: &BackendClient,
    no_browser: bool,
) -> Result<()> {
    let auth_url = backend
        .auth_url()
        .await
        .context("Failed to fetch the Google login URL")?;

    let authority = config.listen_authority()?;
    let listener = TcpListener::bind(&authority)
        .await
        .with_context(|| format!("Failed to listen on {}", authority))?;

    println!("Opening Google sign-in. If no browser appears, visit:");
    println!("  {}", auth_url);
    println!();
    if !no_browser {
        if let Err(e) = open::that(&auth_url) {
            warn!(error = %e, "Could not open a browser");
        }
    }

    match wait_for_login(listener, store.clone(), LOGIN_TIMEOUT).await? {
        LoginOutcome::TokenStored => {
            println!("✓ Logged in");
            if let Some(profile) = restore_session(store) {
                print!("{}", HomeView::LoggedIn { profile });
            }
        }
        LoginOutcome::NoToken => println!("No token received."),
        LoginOutcome::StoreFailed => {
            println!("Token received but could not be saved to {}", store.path().display())
        }
        LoginOutcome::ProviderError => println!("Error Login"),
        LoginOutcome::TimedOut => println!("Timed out waiting for the login redirect."),
    }
    Ok(())
}

fn logout(store: &TokenStore) -> Result<()> {
    if store.clear()? {
        println!("✓ Logged out");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

async fn profile(store: &TokenStore, backend: &BackendClient) -> Result<()> {
    let Some(token) = store.load()? else {
        println!("Not logged in.");
        return Ok(());
    };

    match backend.profile(&token).await? {
        ProfileResponse::Verified(claims) => println!("{}", serde_json::to_string_pretty(&claims)?),
        ProfileResponse::Rejected(reason) => println!("Rejected by auth service: {}", reason),
    }
    Ok(())
}
