//! Session endpoints backed by the `access_token` cookie.

use super::{state::RelayState, types::SessionResponse};
use crate::{guard::SessionState, session::clear_session_cookie};
use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::error;

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Roles decoded from the session cookie (not verified)", body = SessionResponse),
        (status = 204, description = "No session cookie")
    ),
    tag = "auth"
)]
pub async fn session(headers: HeaderMap) -> Response {
    let state = SessionState::from_headers(&headers);
    if !state.is_authenticated() {
        return StatusCode::NO_CONTENT.into_response();
    }

    let response = SessionResponse {
        roles: state.roles().to_vec(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Session cookie cleared")
    ),
    tag = "auth"
)]
pub async fn logout(state: Extension<Arc<RelayState>>) -> Response {
    // Always clear the cookie, even when none was sent.
    let mut headers = HeaderMap::new();
    match clear_session_cookie(state.secure_cookies()) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(e) => error!("Failed to build cleared session cookie: {e}"),
    }
    (StatusCode::NO_CONTENT, headers).into_response()
}
