use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::credential::errors::AuthError;
use crate::domain::credential::models::Credential;
use crate::domain::credential::models::Username;
use crate::domain::credential::ports::CredentialStore;

/// Credential store kept in process memory, keyed by username.
///
/// Uniqueness is enforced under the write lock, so two concurrent
/// registrations of the same username cannot both succeed.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    credentials: RwLock<HashMap<String, Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.credentials.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.credentials.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create(&self, credential: Credential) -> Result<Credential, AuthError> {
        let mut credentials = self.credentials.write().await;

        let key = credential.username.as_str().to_string();
        if credentials.contains_key(&key) {
            return Err(AuthError::DuplicateUsername(key));
        }

        credentials.insert(key, credential.clone());
        Ok(credential)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Credential>, AuthError> {
        Ok(self
            .credentials
            .read()
            .await
            .get(username.as_str())
            .cloned())
    }
}
