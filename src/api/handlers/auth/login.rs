use super::{
    error::RelayError,
    state::RelayState,
    types::{LoginRequest, LoginResponse, MessageResponse, UpstreamLoginEnvelope, UpstreamLoginRequest},
};
use crate::{api::handlers::valid_email, session::session_cookie};
use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, error, instrument};

const LOGIN_FAILED: &str = "Login failed";

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Login successful, `access_token` cookie set", body = LoginResponse, content_type = "application/json"),
        (status = 400, description = "Missing payload, invalid email or undecryptable password", body = MessageResponse),
        (status = 401, description = "Upstream rejected the credentials or replied with an incomplete session", body = MessageResponse),
    ),
    tag = "auth"
)]
// the payload carries credentials, keep it out of the span
#[instrument(skip_all)]
pub async fn login(
    state: Extension<Arc<RelayState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Response, RelayError> {
    let Some(Json(request)) = payload else {
        return Err(RelayError::MissingPayload);
    };

    let email = request.email.trim();
    if !valid_email(email) {
        debug!("Invalid email");
        return Err(RelayError::InvalidEmail);
    }

    let password = SecretString::from(state.cipher().decrypt(&request.password));
    if password.expose_secret().is_empty() {
        debug!("Password payload could not be decrypted");
        return Err(RelayError::InvalidPayload);
    }

    let credentials = UpstreamLoginRequest {
        email,
        password: password.expose_secret(),
    };

    let response = state.upstream().login(&credentials).await.map_err(|e| {
        error!("Error reaching upstream login: {e}");
        RelayError::Transport(LOGIN_FAILED)
    })?;

    let status = response.status();
    let body = response.bytes().await.map_err(|e| {
        error!("Error reading upstream login response: {e}");
        RelayError::Transport(LOGIN_FAILED)
    })?;

    if !status.is_success() {
        debug!("Upstream rejected login: {status}");
        return Err(RelayError::from_upstream(status, &body, LOGIN_FAILED));
    }

    let login: LoginResponse = serde_json::from_slice::<UpstreamLoginEnvelope>(&body)
        .ok()
        .and_then(UpstreamLoginEnvelope::into_response)
        .ok_or_else(|| {
            error!("Upstream login response is missing token, user or roles");
            RelayError::MalformedUpstream
        })?;

    let cookie = session_cookie(&login.token, state.secure_cookies()).map_err(|e| {
        error!("Upstream token cannot be stored in a cookie: {e}");
        RelayError::MalformedUpstream
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);

    debug!("Login successful");

    Ok((StatusCode::OK, headers, Json(login)).into_response())
}
