//! Session token claim decoding.
//!
//! Tokens are JWT-shaped (`header.payload.signature`). Only the payload is
//! read; the signature is never checked here.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid token format")]
    TokenFormat,
    #[error("invalid base64url encoding")]
    Base64,
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
}

/// Decode the claim set of a session token without verifying it.
///
/// # Errors
/// Returns an error if the token does not have three segments, or the payload
/// segment is not base64url-encoded JSON claims.
pub fn decode_claims(token: &str) -> Result<SessionClaims, Error> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(Error::TokenFormat);
    };

    if payload.is_empty() {
        return Err(Error::TokenFormat);
    }

    let bytes =
        Base64UrlUnpadded::decode_vec(payload.trim_end_matches('=')).map_err(|_| Error::Base64)?;
    Ok(serde_json::from_slice(&bytes)?)
}
