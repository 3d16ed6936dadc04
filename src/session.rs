//! `access_token` cookie helpers shared by the route guard and the relay.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use thiserror::Error;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Seven days.
pub const SESSION_MAX_AGE_SECONDS: u64 = 604_800;

/// Read the session token from the request cookies.
///
/// Empty values count as absent.
#[must_use]
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            if key.trim() != ACCESS_TOKEN_COOKIE {
                return None;
            }
            let val = val.trim();
            (!val.is_empty()).then(|| val.to_string())
        })
}

#[derive(Debug, Error)]
pub enum CookieError {
    #[error("session token contains characters not allowed in a cookie value")]
    InvalidToken,
    #[error(transparent)]
    Header(#[from] InvalidHeaderValue),
}

/// RFC 6265 `cookie-octet`: no controls, whitespace, `"`, `,`, `;` or `\`.
fn is_cookie_octet(byte: u8) -> bool {
    matches!(byte, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

/// Build the `Set-Cookie` value carrying a fresh session token.
///
/// The token comes from the upstream API and is refused unless every byte is
/// a cookie octet, so it cannot smuggle its own cookie attributes.
///
/// # Errors
/// Returns an error if the token is empty or not a valid cookie value.
pub fn session_cookie(token: &str, secure: bool) -> Result<HeaderValue, CookieError> {
    if token.is_empty() || !token.bytes().all(is_cookie_octet) {
        return Err(CookieError::InvalidToken);
    }

    let mut cookie = format!(
        "{ACCESS_TOKEN_COOKIE}={token}; Path=/; Max-Age={SESSION_MAX_AGE_SECONDS}; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    Ok(HeaderValue::from_str(&cookie)?)
}

/// Build the `Set-Cookie` value that expires the session cookie.
///
/// # Errors
/// Returns an error if the cookie cannot be encoded as a header value.
pub fn clear_session_cookie(secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{ACCESS_TOKEN_COOKIE}=; Path=/; Max-Age=0; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}
