use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::current_identity::current_identity;
use super::handlers::login::login;
use super::handlers::not_found::not_found;
use super::handlers::register::register;
use super::middleware::authenticate;
use super::middleware::enforce_access_policy;
use crate::domain::credential::service::AuthService;
use crate::domain::security::policy::AccessPolicy;
use crate::outbound::repositories::InMemoryCredentialStore;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService<InMemoryCredentialStore>>,
    pub authenticator: Arc<Authenticator>,
    pub access_policy: Arc<AccessPolicy>,
}

pub fn create_router(
    auth_service: Arc<AuthService<InMemoryCredentialStore>>,
    authenticator: Arc<Authenticator>,
    access_policy: Arc<AccessPolicy>,
) -> Router {
    let state = AppState {
        auth_service,
        authenticator,
        access_policy,
    };

    // Headers, including Authorization, are not recorded on the span.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    // Outermost first: every request is authenticated before the policy sees it.
    let security_layers = ServiceBuilder::new()
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_access_policy,
        ));

    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/api/me", get(current_identity))
        .fallback(not_found)
        .layer(security_layers)
        .with_state(state)
}
