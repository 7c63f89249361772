//! Mocked Internship Hub backend for client tests.
//!
//! Wraps a wiremock `MockServer` with helpers for the backend's common
//! responses. Anything not covered by a helper can be mounted directly on
//! [`MockBackend::server`].
//!
//! # Example
//!
//! ```rust,ignore
//! use hub_test_utils::MockBackend;
//!
//! let backend = MockBackend::start().await;
//! backend.mock_login_rejected(401, "invalid credentials").await;
//!
//! let (client, _store) = backend.memory_client();
//! let err = client.login(&credentials).await.unwrap_err();
//! assert!(err.is_unauthorized());
//! ```

use crate::fixtures::{error_json, internship_page_json, login_success_json};
use common::config::ClientConfig;
use hub_client::{ApiClient, MemoryTokenStore, Session};
use serde_json::Value;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Mocked backend listening on a random local port.
pub struct MockBackend {
    server: MockServer,
}

impl MockBackend {
    /// Start a backend with no routes mounted.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL of the mocked backend.
    #[must_use]
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Underlying wiremock server, for custom mounts.
    #[must_use]
    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Client configuration pointing at this backend.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::for_base_url(&self.url()).expect("mock server URL is a valid base URL")
    }

    /// Client over `session`, pointing at this backend.
    #[must_use]
    pub fn client(&self, session: Arc<Session>) -> ApiClient {
        ApiClient::new(&self.config(), session).expect("Failed to build API client")
    }

    /// Client over a fresh in-memory session, plus a handle on its store.
    #[must_use]
    pub fn memory_client(&self) -> (ApiClient, MemoryTokenStore) {
        self.memory_client_with(MemoryTokenStore::new())
    }

    /// Client over a session hydrated from `store`.
    #[must_use]
    pub fn memory_client_with(&self, store: MemoryTokenStore) -> (ApiClient, MemoryTokenStore) {
        let session = Session::hydrate(Arc::new(store.clone())).expect("memory store never fails");
        (self.client(Arc::new(session)), store)
    }

    /// Answer `method route` with `status` and a JSON body.
    pub async fn mock_json(&self, http_method: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(http_method))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Successful login returning `token`.
    pub async fn mock_login_success(&self, token: &str) {
        self.mock_json("POST", "/users/login", 200, login_success_json(token))
            .await;
    }

    /// Login rejected with `status` and the backend's `error` message.
    pub async fn mock_login_rejected(&self, status: u16, message: &str) {
        self.mock_json("POST", "/users/login", status, error_json(message))
            .await;
    }

    /// Listing page `page` of `total_pages` with the given ids.
    pub async fn mock_internships_page(&self, page: u32, total_pages: u32, ids: &[&str]) {
        Mock::given(method("GET"))
            .and(path("/recommendations/internships"))
            .and(query_param("page", page.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(internship_page_json(page, total_pages, ids)),
            )
            .mount(&self.server)
            .await;
    }

    /// Requests received so far, in arrival order.
    pub async fn received_requests(&self) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .expect("request recording is enabled")
    }

    /// The single request received so far.
    pub async fn single_request(&self) -> Request {
        let mut requests = self.received_requests().await;
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.remove(0)
    }
}
