use crate::cli::{
    actions::{server::Args, Action},
    commands::{self, crypto, upstream},
};
use anyhow::Result;

/// # Errors
/// Returns an error if required arguments are missing or blank.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches
        .get_one::<u16>(commands::ARG_PORT)
        .copied()
        .unwrap_or(8080);

    let upstream = upstream::Options::parse(matches)?;
    let crypto = crypto::Options::parse(matches)?;

    let production = matches
        .get_one::<String>(commands::ARG_ENVIRONMENT)
        .is_some_and(|env| env == commands::ENV_PRODUCTION);

    Ok(Action::Server(Args {
        port,
        upstream_url: upstream.upstream_url,
        frontend_url: upstream.frontend_url,
        encryption_key: crypto.encryption_key,
        production,
    }))
}
