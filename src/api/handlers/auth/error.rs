//! Relay failures and their HTTP mapping.
//!
//! Every variant is terminal for the request and is answered with a
//! `{"message": ...}` body; nothing is retried.

use super::types::MessageResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing payload")]
    MissingPayload,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Invalid payload")]
    InvalidPayload,
    #[error("Unauthorized")]
    MissingSession,
    #[error("Authentication failed")]
    MalformedUpstream,
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },
    #[error("{0}")]
    Transport(&'static str),
    #[error("Internal server error")]
    Internal,
}

impl RelayError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingPayload | Self::InvalidEmail | Self::InvalidPayload => {
                StatusCode::BAD_REQUEST
            }
            Self::MissingSession | Self::MalformedUpstream => StatusCode::UNAUTHORIZED,
            Self::Upstream { status, .. } => *status,
            Self::Transport(_) | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a non-success upstream reply, keeping its status and `message` when present.
    #[must_use]
    pub fn from_upstream(status: StatusCode, body: &[u8], fallback: &str) -> Self {
        let message = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|body| {
                body.get("message")
                    .and_then(Value::as_str)
                    .filter(|message| !message.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| fallback.to_string());

        Self::Upstream { status, message }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = MessageResponse {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
