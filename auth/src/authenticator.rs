use std::sync::OnceLock;

use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::SigningKey;
use crate::jwt::TokenError;
use crate::jwt::TokenIdentity;
use crate::jwt::TokenService;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::password::PasswordHashing;

/// Plaintext behind the decoy hash checked for logins with no stored credential.
const DECOY_PASSWORD: &str = "decoy-password-never-issued";

/// Authentication coordinator combining password verification and token issuance.
pub struct Authenticator<H = PasswordHasher> {
    password_hasher: H,
    token_service: TokenService,
    decoy_hash: OnceLock<String>,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed bearer token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator issuing tokens with the default TTL.
    ///
    /// # Arguments
    /// * `signing_key` - Process signing key
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(signing_key: SigningKey) -> Self {
        Self::with_hasher(PasswordHasher::new(), TokenService::new(signing_key))
    }

    /// Create a new authenticator issuing tokens valid for `token_ttl`.
    pub fn with_token_ttl(signing_key: SigningKey, token_ttl: Duration) -> Self {
        Self::with_hasher(
            PasswordHasher::new(),
            TokenService::with_ttl(signing_key, token_ttl),
        )
    }
}

impl<H> Authenticator<H>
where
    H: PasswordHashing,
{
    /// Create an authenticator over any password hashing scheme.
    ///
    /// The decoy hash is computed here so the first unknown-user login
    /// costs the same as every later one.
    pub fn with_hasher(password_hasher: H, token_service: TokenService) -> Self {
        let decoy_hash = OnceLock::new();
        if let Ok(hash) = password_hasher.hash(DECOY_PASSWORD) {
            let _ = decoy_hash.set(hash);
        }

        Self {
            password_hasher,
            token_service,
            decoy_hash,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `identity` - Identity the token is issued for
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is malformed
    /// * `TokenError` - Token generation failed
    pub fn authenticate<I>(
        &self,
        password: &str,
        stored_hash: &str,
        identity: &I,
    ) -> Result<AuthenticationResult, AuthenticationError>
    where
        I: TokenIdentity + ?Sized,
    {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.token_service.issue_now(identity)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Reject a login that names no stored credential.
    ///
    /// Runs a full verification against the decoy hash first, so this costs
    /// as much as a wrong password for a known user. Always returns
    /// `InvalidCredentials`.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        let _ = self
            .decoy_hash()
            .and_then(|hash| self.password_hasher.verify(password, hash));

        AuthenticationError::InvalidCredentials
    }

    fn decoy_hash(&self) -> Result<&str, PasswordError> {
        if let Some(hash) = self.decoy_hash.get() {
            return Ok(hash);
        }

        let hash = self.password_hasher.hash(DECOY_PASSWORD)?;
        Ok(self.decoy_hash.get_or_init(|| hash))
    }

    /// Issue a token without password verification.
    ///
    /// Used right after registration, where the password was just set.
    pub fn generate_token<I>(&self, identity: &I) -> Result<String, TokenError>
    where
        I: TokenIdentity + ?Sized,
    {
        self.token_service.issue_now(identity)
    }

    /// Verify a token against the current time and return its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.token_service.verify_now(token)
    }
}
