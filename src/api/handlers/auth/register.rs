use super::{
    error::RelayError,
    state::RelayState,
    types::{MessageResponse, RegisterRequest, UpstreamRegisterRequest},
};
use crate::session::extract_session_token;
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, error, instrument};

const REGISTER_FAILED: &str = "Registration failed";

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses (
        (status = 201, description = "Upstream registration response, relayed verbatim"),
        (status = 400, description = "Missing payload or undecryptable password", body = MessageResponse),
        (status = 401, description = "No session cookie", body = MessageResponse),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn register(
    headers: HeaderMap,
    state: Extension<Arc<RelayState>>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<Response, RelayError> {
    let Some(Json(request)) = payload else {
        return Err(RelayError::MissingPayload);
    };

    let Some(token) = extract_session_token(&headers) else {
        debug!("Registration attempted without a session");
        return Err(RelayError::MissingSession);
    };

    let password = SecretString::from(state.cipher().decrypt(&request.password));
    if password.expose_secret().is_empty() {
        debug!("Password payload could not be decrypted");
        return Err(RelayError::InvalidPayload);
    }

    let registration = UpstreamRegisterRequest {
        name: &request.name,
        email: &request.email,
        password: password.expose_secret(),
    };

    let response = state
        .upstream()
        .register(&registration, &token)
        .await
        .map_err(|e| {
            error!("Error reaching upstream registration: {e}");
            RelayError::Transport(REGISTER_FAILED)
        })?;

    let status = response.status();
    let content_type = response.headers().get(CONTENT_TYPE).cloned();
    let body = response.bytes().await.map_err(|e| {
        error!("Error reading upstream registration response: {e}");
        RelayError::Transport(REGISTER_FAILED)
    })?;

    debug!("Upstream registration replied: {status}");

    let mut response_headers = HeaderMap::new();
    if let Some(content_type) = content_type {
        response_headers.insert(CONTENT_TYPE, content_type);
    }

    Ok((status, response_headers, body).into_response())
}
