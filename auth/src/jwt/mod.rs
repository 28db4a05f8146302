pub mod claims;
pub mod errors;
pub mod key;
pub mod service;

pub use claims::Claims;
pub use claims::TokenIdentity;
pub use errors::TokenError;
pub use key::SigningKey;
pub use service::TokenService;
