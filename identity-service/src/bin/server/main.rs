use std::sync::Arc;

use auth::Authenticator;
use auth::SigningKey;
use chrono::Duration;
use identity_service::config::Config;
use identity_service::domain::credential::service::AuthService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryCredentialStore;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_expiration_minutes = config.jwt.expiration_minutes,
        "Configuration loaded"
    );

    let signing_key = SigningKey::from_base64(&config.jwt.secret)?;
    let authenticator = Arc::new(Authenticator::with_token_ttl(
        signing_key,
        Duration::minutes(config.jwt.expiration_minutes),
    ));

    let credential_store = Arc::new(InMemoryCredentialStore::new());
    tracing::info!(store = "in-memory", "Credential store ready");

    let auth_service = Arc::new(AuthService::new(
        credential_store,
        Arc::clone(&authenticator),
    ));
    let access_policy = Arc::new(config.security.access_policy());

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, authenticator, access_policy);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");

    Ok(())
}
