use crate::{api::upstream::UpstreamClient, crypto::CredentialCipher};

/// Shared, immutable state for the relay handlers.
#[derive(Debug, Clone)]
pub struct RelayState {
    cipher: CredentialCipher,
    upstream: UpstreamClient,
    secure_cookies: bool,
}

impl RelayState {
    #[must_use]
    pub fn new(cipher: CredentialCipher, upstream: UpstreamClient) -> Self {
        Self {
            cipher,
            upstream,
            secure_cookies: false,
        }
    }

    /// Mark session cookies `Secure` (production deployments).
    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn cipher(&self) -> &CredentialCipher {
        &self.cipher
    }

    #[must_use]
    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }

    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }
}
