use std::sync::Arc;

use auth::Authenticator;
use auth::SigningKey;
use auth::TokenIdentity;
use identity_service::domain::credential::service::AuthService;
use identity_service::domain::security::policy::AccessPolicy;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryCredentialStore;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

pub fn signing_key() -> SigningKey {
    SigningKey::from_bytes(TEST_SECRET).expect("Test key is long enough")
}

/// Identity used to mint tokens directly, bypassing the HTTP surface.
pub struct TestIdentity {
    pub username: String,
    pub id: String,
}

impl TokenIdentity for TestIdentity {
    fn subject(&self) -> &str {
        &self.username
    }

    fn identifier(&self) -> String {
        self.id.clone()
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(signing_key()));
        let store = Arc::new(InMemoryCredentialStore::new());
        let auth_service = Arc::new(AuthService::new(store, Arc::clone(&authenticator)));

        let router = create_router(
            auth_service,
            Arc::clone(&authenticator),
            Arc::new(AccessPolicy::default()),
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            authenticator,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a credential and return the issued token.
    pub async fn register(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/auth/register")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["token"]
            .as_str()
            .expect("Token missing from response")
            .to_string()
    }
}
