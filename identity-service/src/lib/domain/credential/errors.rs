use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

use crate::domain::credential::models::Role;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Top-level error for authentication and authorization.
///
/// Unknown usernames and wrong passwords both surface as
/// `InvalidCredentials`; nothing here says which one happened.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Token is invalid")]
    TokenInvalid,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Role {0} required")]
    Forbidden(Role),

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Credential store error: {0}")]
    Store(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid(_) => AuthError::TokenInvalid,
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::EncodingFailed(_) | TokenError::MalformedKey(_) | TokenError::WeakKey(_) => {
                AuthError::TokenIssuance(err.to_string())
            }
        }
    }
}

impl From<auth::AuthenticationError> for AuthError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
            auth::AuthenticationError::PasswordError(e) => AuthError::Password(e),
            auth::AuthenticationError::TokenError(e) => AuthError::from(e),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Unknown(err.to_string())
    }
}
