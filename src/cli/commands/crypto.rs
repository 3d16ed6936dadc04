use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_ENCRYPTION_KEY: &str = "encryption-key";

#[derive(Debug, Clone)]
pub struct Options {
    pub encryption_key: SecretString,
}

impl Options {
    /// Parse the shared encryption key.
    ///
    /// # Errors
    /// Returns an error if the key is missing or blank.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let key = matches
            .get_one::<String>(ARG_ENCRYPTION_KEY)
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_ENCRYPTION_KEY}"))?;

        Ok(Self {
            encryption_key: SecretString::from(key),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_ENCRYPTION_KEY)
            .long(ARG_ENCRYPTION_KEY)
            .help("Shared secret used by clients to encrypt password fields")
            .env("HRGATE_ENCRYPTION_KEY")
            .hide_env_values(true)
            .required(true),
    )
}
