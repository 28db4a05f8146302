use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

use super::errors::TokenError;

/// Process-wide HMAC secret used to sign and verify tokens.
///
/// Built once at startup and shared read-only. The raw bytes are not kept
/// and `Debug` never prints key material.
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    /// Minimum key length for HS256, in bytes.
    pub const MIN_LENGTH: usize = 32;

    /// Build a key from base64 (standard alphabet) configuration value.
    ///
    /// # Errors
    /// * `MalformedKey` - Value is not valid base64
    /// * `WeakKey` - Decoded key is shorter than 256 bits
    pub fn from_base64(encoded: &str) -> Result<Self, TokenError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| TokenError::MalformedKey(e.to_string()))?;

        Self::from_bytes(&bytes)
    }

    /// Build a key from raw secret bytes.
    ///
    /// # Errors
    /// * `WeakKey` - Secret is shorter than 256 bits
    pub fn from_bytes(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.len() < Self::MIN_LENGTH {
            return Err(TokenError::WeakKey(secret.len() * 8));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}
