use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::PasswordHasher;
use auth::PasswordHashing;
use chrono::Utc;

use crate::domain::credential::errors::AuthError;
use crate::domain::credential::models::AuthToken;
use crate::domain::credential::models::Credential;
use crate::domain::credential::models::CredentialId;
use crate::domain::credential::models::LoginCommand;
use crate::domain::credential::models::RegisterCommand;
use crate::domain::credential::models::Role;
use crate::domain::credential::models::Username;
use crate::domain::credential::ports::AuthServicePort;
use crate::domain::credential::ports::CredentialStore;

/// Domain service implementation for login and registration.
///
/// `register` is the only operation that writes to the credential store.
/// Password hashing and verification run on the blocking pool.
pub struct AuthService<CS, H = PasswordHasher>
where
    CS: CredentialStore,
    H: PasswordHashing,
{
    store: Arc<CS>,
    authenticator: Arc<Authenticator<H>>,
}

impl<CS, H> AuthService<CS, H>
where
    CS: CredentialStore,
    H: PasswordHashing,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential store implementation
    /// * `authenticator` - Password hasher and token issuer
    pub fn new(store: Arc<CS>, authenticator: Arc<Authenticator<H>>) -> Self {
        Self {
            store,
            authenticator,
        }
    }
}

/// Run CPU-bound password work off the async workers.
async fn run_blocking<T, F>(task: F) -> Result<T, AuthError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AuthError::Unknown(format!("Password task failed: {}", e)))
}

#[async_trait]
impl<CS, H> AuthServicePort for AuthService<CS, H>
where
    CS: CredentialStore,
    H: PasswordHashing,
{
    async fn login(&self, command: LoginCommand) -> Result<AuthToken, AuthError> {
        let LoginCommand { username, password } = command;

        // A username that could never have been registered is just another unknown user.
        let credential = match Username::new(username) {
            Ok(username) => self.store.find_by_username(&username).await?,
            Err(_) => None,
        };

        let authenticator = Arc::clone(&self.authenticator);

        let Some(credential) = credential else {
            let rejection = run_blocking(move || authenticator.reject_unknown(&password)).await?;
            tracing::debug!("Login rejected: unknown username");
            return Err(AuthError::from(rejection));
        };

        let (result, credential) = run_blocking(move || {
            let result =
                authenticator.authenticate(&password, &credential.password_hash, &credential);
            (result, credential)
        })
        .await?;

        let result = result.map_err(|e| {
            tracing::debug!(username = %credential.username, error = %e, "Login rejected");
            AuthError::from(e)
        })?;

        tracing::info!(
            credential_id = %credential.id,
            username = %credential.username,
            "Login succeeded"
        );

        Ok(AuthToken(result.access_token))
    }

    async fn register(&self, command: RegisterCommand) -> Result<AuthToken, AuthError> {
        let RegisterCommand { username, password } = command;

        if self.store.find_by_username(&username).await?.is_some() {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }

        let authenticator = Arc::clone(&self.authenticator);
        let password_hash = run_blocking(move || authenticator.hash_password(&password)).await??;

        let credential = Credential {
            id: CredentialId::new(),
            username,
            password_hash,
            role: Role::User,
            created_at: Utc::now(),
        };

        let created = self.store.create(credential).await?;
        let token = self.authenticator.generate_token(&created)?;

        tracing::info!(
            credential_id = %created.id,
            username = %created.username,
            role = %created.role,
            "Credential registered"
        );

        Ok(AuthToken(token))
    }

    async fn resolve(&self, username: &Username) -> Result<Option<Credential>, AuthError> {
        self.store.find_by_username(username).await
    }
}
