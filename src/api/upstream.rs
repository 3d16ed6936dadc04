//! HTTP client for the upstream authentication API.
//!
//! Calls are awaited without a timeout: an unresponsive upstream stalls the
//! request that triggered the call.

use crate::api::handlers::auth::types::{UpstreamLoginRequest, UpstreamRegisterRequest};
use anyhow::{Context, Result};
use reqwest::{Client, Response};
use tracing::instrument;
use url::Url;

pub const LOGIN_PATH: &str = "auth/login";
pub const REGISTER_PATH: &str = "auth/register";

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    login_url: Url,
    register_url: Url,
}

impl UpstreamClient {
    /// # Errors
    /// Returns an error if `base_url` is not an absolute http(s) URL or the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url_with_slash(base_url)?;
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()
            .context("Failed to build upstream HTTP client")?;

        Ok(Self {
            client,
            login_url: base_url.join(LOGIN_PATH)?,
            register_url: base_url.join(REGISTER_PATH)?,
        })
    }

    #[must_use]
    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    #[must_use]
    pub fn register_url(&self) -> &Url {
        &self.register_url
    }

    /// Forward plaintext credentials to the upstream login endpoint.
    ///
    /// # Errors
    /// Returns an error only when no HTTP response was received.
    #[instrument(skip_all, fields(url = %self.login_url))]
    pub async fn login(
        &self,
        credentials: &UpstreamLoginRequest<'_>,
    ) -> Result<Response, reqwest::Error> {
        self.client
            .post(self.login_url.clone())
            .json(credentials)
            .send()
            .await
    }

    /// Forward a registration on behalf of the caller's session.
    ///
    /// # Errors
    /// Returns an error only when no HTTP response was received.
    #[instrument(skip_all, fields(url = %self.register_url))]
    pub async fn register(
        &self,
        registration: &UpstreamRegisterRequest<'_>,
        bearer: &str,
    ) -> Result<Response, reqwest::Error> {
        self.client
            .post(self.register_url.clone())
            .bearer_auth(bearer)
            .json(registration)
            .send()
            .await
    }
}

/// Parse an http(s) base URL and make sure relative joins append to its path.
///
/// # Errors
/// Returns an error if the URL is invalid or not http(s).
pub fn base_url_with_slash(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).with_context(|| format!("Invalid base URL: {raw}"))?;

    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("Base URL must use http or https: {raw}");
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
