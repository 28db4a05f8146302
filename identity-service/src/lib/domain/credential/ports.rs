use async_trait::async_trait;

use crate::domain::credential::errors::AuthError;
use crate::domain::credential::models::AuthToken;
use crate::domain::credential::models::Credential;
use crate::domain::credential::models::LoginCommand;
use crate::domain::credential::models::RegisterCommand;
use crate::domain::credential::models::Username;

/// Port for authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify a username and password and issue a token.
    ///
    /// # Arguments
    /// * `command` - Raw username and plaintext password
    ///
    /// # Returns
    /// Signed bearer token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password (indistinguishable)
    /// * `Store` - Credential lookup failed
    async fn login(&self, command: LoginCommand) -> Result<AuthToken, AuthError>;

    /// Create a credential with role `USER` and issue a token for it.
    ///
    /// # Arguments
    /// * `command` - Validated username and plaintext password
    ///
    /// # Returns
    /// Signed bearer token for the new credential
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken
    /// * `Store` - Credential persistence failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthToken, AuthError>;

    /// Load the credential a verified token names.
    ///
    /// # Returns
    /// Credential, or None if the username no longer exists
    ///
    /// # Errors
    /// * `Store` - Credential lookup failed
    async fn resolve(&self, username: &Username) -> Result<Option<Credential>, AuthError>;
}

/// Lookup and creation of credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new credential.
    ///
    /// # Returns
    /// Created credential
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken; nothing is written
    /// * `Store` - Storage operation failed
    async fn create(&self, credential: Credential) -> Result<Credential, AuthError>;

    /// Retrieve credential by username.
    ///
    /// # Returns
    /// Optional credential (None if not found)
    ///
    /// # Errors
    /// * `Store` - Storage operation failed
    async fn find_by_username(&self, username: &Username)
        -> Result<Option<Credential>, AuthError>;
}
