use clap::{Arg, ArgMatches, Command};

pub const ARG_UPSTREAM_URL: &str = "upstream-url";
pub const ARG_FRONTEND_URL: &str = "frontend-url";

#[derive(Debug, Clone)]
pub struct Options {
    pub upstream_url: String,
    pub frontend_url: String,
}

impl Options {
    /// Parse upstream and front-end URLs from matches.
    ///
    /// # Errors
    /// Returns an error if a URL argument is missing or blank.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let read_required = |id: &str| -> anyhow::Result<String> {
            matches
                .get_one::<String>(id)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
        };

        Ok(Self {
            upstream_url: read_required(ARG_UPSTREAM_URL)?,
            frontend_url: read_required(ARG_FRONTEND_URL)?,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_UPSTREAM_URL)
                .long(ARG_UPSTREAM_URL)
                .help("Base URL of the upstream auth API, example: https://api.hrms.tld/v1")
                .env("HRGATE_UPSTREAM_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_FRONTEND_URL)
                .long(ARG_FRONTEND_URL)
                .help("Base URL of the front-end renderer that serves pages")
                .env("HRGATE_FRONTEND_URL")
                .default_value("http://127.0.0.1:3000"),
        )
}
