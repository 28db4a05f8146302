//! Authentication primitives
//!
//! - Password hashing (Argon2id)
//! - HS256 token issuance and verification with a pinned algorithm
//! - Authentication coordination (verify password, issue token)
//!
//! Credential storage and request handling live in the service crate; this
//! crate only knows about secrets, hashes and tokens.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{SigningKey, TokenIdentity, TokenService};
//!
//! struct User(&'static str);
//!
//! impl TokenIdentity for User {
//!     fn subject(&self) -> &str {
//!         self.0
//!     }
//!
//!     fn identifier(&self) -> String {
//!         "1".to_string()
//!     }
//! }
//!
//! let key = SigningKey::from_bytes(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let service = TokenService::new(key);
//! let token = service.issue_now(&User("alice")).unwrap();
//! let claims = service.verify_now(&token).unwrap();
//! assert_eq!(claims.sub, "alice");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::SigningKey;
pub use jwt::TokenError;
pub use jwt::TokenIdentity;
pub use jwt::TokenService;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordHashing;
