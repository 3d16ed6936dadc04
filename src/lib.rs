//! # hrgate (HRMS edge gatekeeper)
//!
//! `hrgate` sits in front of the HRMS front-end and owns two independent
//! gatekeepers:
//!
//! - **Route guard** ([`guard`]): runs on every request, decodes the role
//!   claims carried by the `access_token` cookie and permits, redirects or
//!   masks the request using an ordered route policy table.
//! - **Credential relay** ([`api::handlers::auth`]): decrypts the password
//!   field of login/registration payloads with the shared key ([`crypto`]),
//!   forwards plaintext credentials to the upstream auth API and relays the
//!   session token back as a cookie.
//!
//! ## Trust model
//!
//! The guard decodes session tokens **without verifying their signature**.
//! Role claims only decide which pages are served; every data call still
//! carries the token to the upstream API, which verifies it. Deployments that
//! need edge-level verification must put a verifying proxy in front.
//!
//! ## Authorization denials
//!
//! Denied requests are rewritten to a path that does not exist and answered
//! with `404 Not Found` instead of `403 Forbidden`, so unauthorized users cannot
//! confirm that a protected page exists.

pub mod api;
pub mod cli;
pub mod crypto;
pub mod guard;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
