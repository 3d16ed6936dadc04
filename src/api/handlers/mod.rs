//! Route handlers and shared validation helpers.

pub mod auth;
pub mod health;
pub mod pages;

use regex::Regex;

/// Lightweight email sanity check run before credentials leave the service.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}
