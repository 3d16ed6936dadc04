#![allow(dead_code)]

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use base64ct::{Base64UrlUnpadded, Encoding};
use http_body_util::BodyExt;
use hrgate::{
    api::{
        self,
        handlers::{auth::RelayState, pages::Frontend},
        upstream::UpstreamClient,
        AppState,
    },
    crypto::CredentialCipher,
    guard::RouteGuard,
};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::{net::TcpListener, sync::Arc};
use tower::ServiceExt;

pub const SHARED_KEY: &str = "integration-shared-key";

pub fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

pub fn cipher() -> Result<CredentialCipher> {
    CredentialCipher::new(&SecretString::from(SHARED_KEY.to_string()))
}

pub fn app(upstream_url: &str, frontend_url: &str, secure: bool) -> Result<Router> {
    let relay = RelayState::new(cipher()?, UpstreamClient::new(upstream_url)?)
        .with_secure_cookies(secure);

    Ok(api::app(AppState {
        guard: Arc::new(RouteGuard::default()),
        relay: Arc::new(relay),
        frontend: Arc::new(Frontend::new(frontend_url)?),
    }))
}

/// Unsigned token carrying `roles`; the gate never checks signatures.
pub fn token_with_roles(roles: &[&str]) -> String {
    token_with_claims(&json!({ "sub": "42", "roles": roles }))
}

pub fn token_with_claims(claims: &Value) -> String {
    let header = Base64UrlUnpadded::encode_string(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = Base64UrlUnpadded::encode_string(claims.to_string().as_bytes());
    format!("{header}.{payload}.signature")
}

pub async fn send(app: Router, request: Request<Body>) -> Result<Response<Body>> {
    Ok(app.oneshot(request).await?)
}

pub async fn body_bytes(response: Response<Body>) -> Result<Vec<u8>> {
    Ok(response.into_body().collect().await?.to_bytes().to_vec())
}

pub async fn body_json(response: Response<Body>) -> Result<Value> {
    Ok(serde_json::from_slice(&body_bytes(response).await?)?)
}
