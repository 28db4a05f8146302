use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;
use crate::domain::security::context::SecurityContext;

/// Who the caller was authenticated as.
pub async fn current_identity(context: SecurityContext) -> ApiSuccess<IdentityResponseData> {
    ApiSuccess::new(StatusCode::OK, (&context).into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityResponseData {
    pub id: String,
    pub username: String,
    pub roles: Vec<String>,
}

impl From<&SecurityContext> for IdentityResponseData {
    fn from(context: &SecurityContext) -> Self {
        Self {
            id: context.principal().id.to_string(),
            username: context.username().as_str().to_string(),
            roles: context
                .authorities()
                .iter()
                .map(|role| role.as_str().to_string())
                .collect(),
        }
    }
}
