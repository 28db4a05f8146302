use super::argon2::PasswordHasher;
use super::errors::PasswordError;

/// Password hashing scheme used by the `Authenticator`.
pub trait PasswordHashing: Send + Sync + 'static {
    /// Hash a plaintext password with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// `Ok(false)` on mismatch; `Err` only when `hash` cannot be used.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}

impl PasswordHashing for PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        PasswordHasher::hash(self, password)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        PasswordHasher::verify(self, password, hash)
    }
}
