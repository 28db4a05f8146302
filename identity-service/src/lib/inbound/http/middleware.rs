use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::credential::errors::AuthError;
use crate::domain::credential::models::Username;
use crate::domain::credential::ports::AuthServicePort;
use crate::domain::security::context::SecurityContext;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Resolves the caller from a bearer token and stores a `SecurityContext`
/// in the request extensions.
///
/// Never rejects: a missing, malformed, expired or unknown token just leaves
/// the request without a context, and `enforce_access_policy` decides.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if req.extensions().get::<SecurityContext>().is_none() {
        let context = resolve_security_context(&state, req.headers()).await;
        if let Some(context) = context {
            req.extensions_mut().insert(context);
        }
    }

    next.run(req).await
}

/// Rejects requests to protected routes that carry no `SecurityContext`.
pub async fn enforce_access_policy(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = req.extensions().get::<SecurityContext>();

    state
        .access_policy
        .check(req.uri().path(), context)
        .map_err(|e| {
            tracing::info!(
                method = %req.method(),
                path = %req.uri().path(),
                "Rejected request without identity"
            );
            ApiError::from(e)
        })?;

    Ok(next.run(req).await)
}

async fn resolve_security_context(state: &AppState, headers: &HeaderMap) -> Option<SecurityContext> {
    let token = extract_bearer_token(headers)?;

    let claims = state
        .authenticator
        .validate_token(token)
        .map_err(|e| tracing::debug!(error = %e, "Bearer token rejected"))
        .ok()?;

    let username = Username::new(claims.sub)
        .map_err(|e| tracing::warn!(error = %e, "Token subject is not a valid username"))
        .ok()?;

    let credential = match state.auth_service.resolve(&username).await {
        Ok(Some(credential)) => credential,
        Ok(None) => {
            tracing::warn!(username = %username, "Token subject no longer exists");
            return None;
        }
        Err(e) => {
            tracing::error!(username = %username, error = %e, "Credential lookup failed");
            return None;
        }
    };

    // Guards against a username that was re-registered after the token was issued.
    if credential.id.to_string() != claims.user_id {
        tracing::warn!(username = %username, "Token names a different credential");
        return None;
    }

    tracing::debug!(
        credential_id = %credential.id,
        username = %credential.username,
        "Request authenticated"
    );

    Some(SecurityContext::from(&credential))
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

/// Handlers take `SecurityContext` as an argument to require an identity.
#[async_trait]
impl<S> FromRequestParts<S> for SecurityContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .ok_or_else(|| ApiError::from(AuthError::AuthenticationRequired))
    }
}
