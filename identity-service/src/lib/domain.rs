pub mod credential;
pub mod security;
