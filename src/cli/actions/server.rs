use crate::{
    api::{
        self,
        handlers::{auth::RelayState, pages::Frontend},
        upstream::UpstreamClient,
        AppState,
    },
    cli::telemetry,
    crypto::CredentialCipher,
    guard::RouteGuard,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{fmt::Write as _, sync::Arc};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub upstream_url: String,
    pub frontend_url: String,
    pub encryption_key: SecretString,
    pub production: bool,
}

/// Build the application state from the parsed arguments.
///
/// # Errors
/// Returns an error if the encryption key is unusable or a URL is invalid.
pub fn app_state(args: &Args) -> Result<AppState> {
    let cipher = CredentialCipher::new(&args.encryption_key)
        .context("Invalid encryption key, refusing to start")?;
    let upstream =
        UpstreamClient::new(&args.upstream_url).context("Invalid upstream auth API URL")?;
    let frontend = Frontend::new(&args.frontend_url).context("Invalid front-end URL")?;

    Ok(AppState {
        guard: Arc::new(RouteGuard::default()),
        relay: Arc::new(RelayState::new(cipher, upstream).with_secure_cookies(args.production)),
        frontend: Arc::new(frontend),
    })
}

/// Execute the server action.
/// # Errors
/// Returns an error if the state cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let state = app_state(&args)?;

    log_startup_args(&args, &state);

    let result = api::new(args.port, state).await;

    telemetry::shutdown_tracer();

    result
}

fn log_startup_args(args: &Args, state: &AppState) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("upstream_login", state.relay.upstream().login_url().to_string()),
        (
            "upstream_register",
            state.relay.upstream().register_url().to_string(),
        ),
        ("frontend", args.frontend_url.clone()),
        ("secure_cookies", args.production.to_string()),
        (
            "route_policies",
            state.guard.config().policies.entries().len().to_string(),
        ),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in &entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ = write!(message, "\n  {key}:{padding} {value}");
    }
    info!("{message}");
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}
