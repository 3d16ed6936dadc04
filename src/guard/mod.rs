//! Route guard: authentication and coarse role checks before any page runs.
//!
//! Flow overview: read the `access_token` cookie, decode its role claims
//! (never verified, see the crate docs), then apply the policy in
//! [`RouteGuard::evaluate`]. The guard keeps no state between requests.
//!
//! The middleware must wrap the whole router, not be added with
//! `Router::layer`, because masked requests are rewritten and routed again.

pub mod policy;
pub mod token;

pub use policy::{PolicyError, RoutePolicy, RoutePolicyTable};

use crate::session::extract_session_token;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};
use url::form_urlencoded;

/// Rewrite target for denied requests. No page exists here, so the front-end
/// answers with its own not-found page.
pub const MASKED_PATH: &str = "/404";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    AuthenticatedNoClaims,
    AuthenticatedWithRoles(Vec<String>),
}

impl SessionState {
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::from_token(extract_session_token(headers).as_deref())
    }

    /// Resolve the session state for an optional raw token.
    ///
    /// Undecodable tokens still count as authenticated, just without roles.
    #[must_use]
    pub fn from_token(token: Option<&str>) -> Self {
        let Some(token) = token else {
            return Self::Unauthenticated;
        };

        match token::decode_claims(token) {
            Ok(claims) => Self::AuthenticatedWithRoles(claims.roles),
            Err(e) => {
                warn!("Failed to decode session token claims: {e}");
                Self::AuthenticatedNoClaims
            }
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Unauthenticated)
    }

    #[must_use]
    pub fn roles(&self) -> &[String] {
        match self {
            Self::AuthenticatedWithRoles(roles) => roles,
            Self::Unauthenticated | Self::AuthenticatedNoClaims => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(String),
    Mask,
}

#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub sign_in_path: String,
    pub protected_prefixes: Vec<String>,
    pub admin_landing: String,
    pub default_landing: String,
    pub admin_role: String,
    pub policies: RoutePolicyTable,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            sign_in_path: "/sign-in".to_string(),
            protected_prefixes: vec!["/dashboard".to_string()],
            admin_landing: "/dashboard/admin".to_string(),
            default_landing: "/dashboard/dash".to_string(),
            admin_role: policy::ROLE_ADMIN.to_string(),
            policies: RoutePolicyTable::hrms(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    config: GuardConfig,
}

impl RouteGuard {
    #[must_use]
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    fn is_sign_in(&self, path: &str) -> bool {
        path.starts_with(&self.config.sign_in_path)
    }

    fn is_protected(&self, path: &str) -> bool {
        self.config
            .protected_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    fn landing_for(&self, session: &SessionState) -> &str {
        if session.roles().contains(&self.config.admin_role) {
            &self.config.admin_landing
        } else {
            &self.config.default_landing
        }
    }

    fn sign_in_redirect(&self, from: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("from", from)
            .finish();
        format!("{}?{query}", self.config.sign_in_path)
    }

    /// Decide what to do with a request for `path`.
    #[must_use]
    pub fn evaluate(&self, session: &SessionState, path: &str) -> Decision {
        if self.is_sign_in(path) {
            return if session.is_authenticated() {
                Decision::Redirect(self.landing_for(session).to_string())
            } else {
                Decision::Allow
            };
        }

        if !self.is_protected(path) {
            return Decision::Allow;
        }

        if !session.is_authenticated() {
            return Decision::Redirect(self.sign_in_redirect(path));
        }

        // Unlisted protected paths stay open to any authenticated user.
        match self.config.policies.lookup(path) {
            Some(entry) if !entry.allows(session.roles()) => Decision::Mask,
            _ => Decision::Allow,
        }
    }
}

/// Middleware applying [`RouteGuard::evaluate`] to every request.
pub async fn route_guard(
    State(guard): State<Arc<RouteGuard>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let session = SessionState::from_headers(request.headers());

    match guard.evaluate(&session, &path) {
        Decision::Allow => next.run(request).await,
        Decision::Redirect(location) => {
            debug!("Redirecting {path} to {location}");
            Redirect::temporary(&location).into_response()
        }
        Decision::Mask => {
            debug!("Masking {path}");
            *request.uri_mut() = Uri::from_static(MASKED_PATH);
            next.run(request).await
        }
    }
}
