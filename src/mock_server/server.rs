//! Mock FortiOS API server.
//!
//! Provides an axum-based HTTP server that simulates the CMDB REST API.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::Fixtures;
use super::handlers;
use super::state::MockState;

/// A mock FortiGate for testing.
///
/// The server runs in the background and can be used to test the client
/// against a stateful CMDB implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Fixtures::default_state()).await
    }

    /// Start a mock server with no tables at all.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `FortiClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows inspecting or modifying the configuration during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the axum router with all routes.
    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            .route(
                "/api/v2/cmdb/:category/:object",
                get(handlers::list_entries).post(handlers::create_entry),
            )
            .route(
                "/api/v2/cmdb/:category/:object/:mkey",
                get(handlers::get_entry)
                    .put(handlers::update_entry)
                    .post(handlers::clone_entry)
                    .delete(handlers::delete_entry),
            )
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Address, CmdbQuery, Crud, FortiClient, FortiError, RequestOptions};

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        // Server should be accessible
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_get_address_with_forti_client() {
        let server = MockServer::start().await;
        let client = FortiClient::new("test-token", server.url()).unwrap();

        let address = Address::get(&client, "web01")
            .await
            .expect("Failed to get address");

        assert_eq!(address.subnet.as_deref(), Some("10.1.1.10 255.255.255.255"));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_list_addresses_with_forti_client() {
        let server = MockServer::start().await;
        let client = FortiClient::new("test-token", server.url()).unwrap();

        let page = Address::list_page(&client, &CmdbQuery::new(), 0, 2)
            .await
            .expect("Failed to list addresses");

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, Some(4));
        assert!(page.has_more);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let client = FortiClient::new("test-token", server.url()).unwrap();

        let result = Address::get(&client, "web01").await;

        assert!(result.is_err());

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_required_token() {
        let state = Fixtures::default_state().with_required_token("secret");
        let server = MockServer::with_state(state).await;

        let wrong = FortiClient::new("wrong", server.url()).unwrap();
        let err = Address::list(&wrong, &CmdbQuery::new()).await.unwrap_err();
        assert!(matches!(err, FortiError::Unauthorized { http_status: 401 }));

        let right = FortiClient::new("secret", server.url()).unwrap();
        assert!(Address::exists(&right, "web01", &RequestOptions::default()).await);

        server.shutdown().await;
    }
}
