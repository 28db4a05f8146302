use thiserror::Error;

/// Error type for token operations.
///
/// Every decoding, signature or algorithm failure is folded into `Invalid`;
/// callers never see the underlying JWT library error kinds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is invalid: {0}")]
    Invalid(String),

    #[error("Token is expired")]
    Expired,

    #[error("Signing key is malformed: {0}")]
    MalformedKey(String),

    #[error("Signing key is too weak: {0} bits, at least 256 bits required")]
    WeakKey(usize),
}
