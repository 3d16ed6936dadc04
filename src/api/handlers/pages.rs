//! Page traffic: everything without a local route goes to the front-end renderer.

use crate::api::upstream::base_url_with_slash;
use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    extract::{Extension, Request},
    http::{
        header::{CONNECTION, CONTENT_LENGTH, HOST, TRANSFER_ENCODING},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
};
use reqwest::Client;
use std::sync::Arc;
use tracing::{error, instrument};
use url::Url;

/// Page requests are small; larger bodies are refused.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Frontend {
    client: Client,
    base_url: Url,
}

impl Frontend {
    /// # Errors
    /// Returns an error if `base_url` is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url_with_slash(base_url)?;
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to build front-end HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Resolve an incoming path and query against the front-end base URL.
    ///
    /// # Errors
    /// Returns an error if the joined URL is invalid.
    pub fn target(&self, path_and_query: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path_and_query.trim_start_matches('/'))
    }
}

fn strip_hop_headers(headers: &mut HeaderMap) {
    for name in [HOST, CONNECTION, TRANSFER_ENCODING, CONTENT_LENGTH] {
        headers.remove(name);
    }
}

/// Forward a request the guard let through to the front-end and stream the reply back.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn proxy(frontend: Extension<Arc<Frontend>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or("/", |path_and_query| path_and_query.as_str());

    let target = match frontend.target(path_and_query) {
        Ok(target) => target,
        Err(e) => {
            error!("Invalid front-end target for {path_and_query}: {e}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let body = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to read request body: {e}");
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let mut headers = parts.headers;
    strip_hop_headers(&mut headers);

    let upstream = frontend
        .client
        .request(parts.method, target)
        .headers(headers)
        .body(body)
        .send()
        .await;

    match upstream {
        Ok(upstream) => {
            let status = upstream.status();
            let mut headers = upstream.headers().clone();
            headers.remove(CONNECTION);
            headers.remove(TRANSFER_ENCODING);

            (status, headers, Body::from_stream(upstream.bytes_stream())).into_response()
        }
        Err(e) => {
            error!("Error reaching front-end: {e}");
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}
