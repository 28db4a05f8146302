pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::credential;
pub use domain::security;
pub use outbound::repositories;
