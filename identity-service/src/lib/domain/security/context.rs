use std::collections::BTreeSet;

use crate::domain::credential::errors::AuthError;
use crate::domain::credential::models::Credential;
use crate::domain::credential::models::CredentialId;
use crate::domain::credential::models::Role;
use crate::domain::credential::models::Username;

/// Identity a request was authenticated as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: CredentialId,
    pub username: Username,
}

/// Per-request record of who is calling and what they may do.
///
/// Built fresh for every request from a freshly resolved credential and
/// carried in that request's extensions. It is never cached or shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityContext {
    principal: Principal,
    authorities: BTreeSet<Role>,
}

impl SecurityContext {
    pub fn new(principal: Principal, authorities: BTreeSet<Role>) -> Self {
        Self {
            principal,
            authorities,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn username(&self) -> &Username {
        &self.principal.username
    }

    pub fn authorities(&self) -> &BTreeSet<Role> {
        &self.authorities
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.authorities.contains(&role)
    }

    /// # Errors
    /// * `Forbidden` - The identity was not granted `role`
    pub fn require_role(&self, role: Role) -> Result<(), AuthError> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(AuthError::Forbidden(role))
        }
    }
}

impl From<&Credential> for SecurityContext {
    fn from(credential: &Credential) -> Self {
        Self::new(
            Principal {
                id: credential.id,
                username: credential.username.clone(),
            },
            BTreeSet::from([credential.role]),
        )
    }
}
