//! Request/response types for the credential relay.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Login payload; `password` is a ciphertext under the shared key.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Employee registration payload; `password` is a ciphertext under the shared key.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    #[schema(value_type = Object)]
    pub user: Value,
    #[schema(value_type = Option<Object>)]
    pub employee: Value,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub roles: Vec<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

/// Plaintext credentials sent upstream.
#[derive(Serialize)]
pub struct UpstreamLoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct UpstreamRegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful upstream login envelope: `{"result": {"token", "user", "employee"}}`.
#[derive(Deserialize, Debug, Default)]
pub struct UpstreamLoginEnvelope {
    #[serde(default)]
    pub result: Option<UpstreamLoginResult>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpstreamLoginResult {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub employee: Option<Value>,
}

impl UpstreamLoginEnvelope {
    /// Validate the login shape: a non-empty token and a user with at least one role.
    #[must_use]
    pub fn into_response(self) -> Option<LoginResponse> {
        let result = self.result?;
        let token = result.token.filter(|token| !token.is_empty())?;
        let user = result.user?;

        let has_roles = user
            .get("roles")
            .and_then(Value::as_array)
            .is_some_and(|roles| !roles.is_empty());
        if !has_roles {
            return None;
        }

        Some(LoginResponse {
            token,
            user,
            employee: result.employee.unwrap_or(Value::Null),
        })
    }
}
