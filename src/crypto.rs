//! Shared-key cipher for password fields submitted by the front-end.
//!
//! The client and this service share one secret. The 32-byte key is the
//! SHA-256 digest of that secret, and ciphertexts travel as standard base64 of
//! `nonce (12 bytes) || ciphertext`.

use anyhow::{anyhow, Result};
use base64ct::{Base64, Encoding};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use tracing::debug;

const NONCE_LEN: usize = 12;

#[derive(Clone)]
pub struct CredentialCipher {
    cipher: ChaCha20Poly1305,
}

impl CredentialCipher {
    /// Derive the cipher from the shared secret.
    ///
    /// # Errors
    /// Returns an error if the secret is empty or only whitespace.
    #[allow(deprecated)]
    pub fn new(secret: &SecretString) -> Result<Self> {
        let secret = secret.expose_secret();
        if secret.trim().is_empty() {
            return Err(anyhow!("encryption key must not be empty"));
        }

        let digest = Sha256::digest(secret.as_bytes());
        let cipher = ChaCha20Poly1305::new(Key::from_slice(digest.as_slice()));

        Ok(Self { cipher })
    }

    /// Encrypt `plaintext` with a fresh random nonce.
    ///
    /// # Errors
    /// Returns an error if encryption fails.
    #[allow(deprecated)]
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|e| anyhow!("Encryption failure: {e}"))?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&ciphertext);

        Ok(Base64::encode_string(&payload))
    }

    /// Decrypt a ciphertext produced under the shared key.
    ///
    /// Any failure (bad encoding, truncated input, wrong key, tampering,
    /// non-UTF-8 plaintext) yields an empty string.
    #[allow(deprecated)]
    #[must_use]
    pub fn decrypt(&self, ciphertext: &str) -> String {
        let Ok(payload) = Base64::decode_vec(ciphertext.trim()) else {
            debug!("credential payload is not valid base64");
            return String::new();
        };

        if payload.len() <= NONCE_LEN {
            debug!("credential payload too short");
            return String::new();
        }

        let (nonce_bytes, sealed) = payload.split_at(NONCE_LEN);
        match self.cipher.decrypt(Nonce::from_slice(nonce_bytes), sealed) {
            Ok(plaintext) => String::from_utf8(plaintext).unwrap_or_default(),
            Err(_) => {
                debug!("credential payload failed authentication");
                String::new()
            }
        }
    }
}

impl std::fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCipher")
            .field("key", &"***")
            .finish()
    }
}
