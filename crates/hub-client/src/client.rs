//! HTTP client for the Internship Hub backend.
//!
//! [`ApiClient::request`] is the single place where calls are issued and
//! outcomes normalized; every named operation is a thin wrapper over it.
//!
//! # Security
//!
//! - The bearer header is built from the [`Session`] on every call and marked
//!   sensitive
//! - Callers cannot supply their own `Authorization` or `Content-Type`
//! - Response bodies are only logged after [`sanitize_error_body`]

use crate::errors::{ApiError, StorageError};
use crate::models::{
    Internship, InternshipPage, LoginRequest, LoginResponse, ProfileUpdate,
    RecommendationsRequest, RecommendationsResponse, RegisterRequest, SearchParams,
};
use crate::sanitize::sanitize_error_body;
use crate::session::Session;
use common::config::ClientConfig;
use common::secret::{ExposeSecret, SecretString};
use common::types::InternshipId;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Method, body, query and extra headers of a single call.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: None,
            query: Vec::new(),
            headers: HeaderMap::new(),
        }
    }

    #[must_use]
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    #[must_use]
    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    #[must_use]
    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Encode` if `body` cannot be represented as JSON.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    #[must_use]
    pub fn with_query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a caller header. `Authorization` and `Content-Type` are always
    /// replaced by the client's own values.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Client for the Internship Hub backend.
///
/// Cheap to clone; clones share the connection pool and the [`Session`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<Session>,
    default_max_distance_km: u32,
}

impl ApiClient {
    /// Create a client for the backend named in `config`.
    ///
    /// No request timeout is configured; callers bound individual calls with
    /// `tokio::time::timeout` where needed.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: Arc<Session>) -> Result<Self, ApiError> {
        let http = Client::builder().build().map_err(|e| {
            warn!(error = %e, "Failed to build HTTP client");
            ApiError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
            default_max_distance_km: config.default_max_distance_km,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Replace or clear the session token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if durable storage cannot be updated.
    pub fn set_token(&self, token: Option<SecretString>) -> Result<(), StorageError> {
        self.session.set_token(token)
    }

    /// Headers sent with every call: JSON content type, plus the bearer
    /// credential while a token is held.
    #[must_use]
    pub fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.session.token() {
            match HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => {
                    warn!("Session token is not a valid header value, sending without credentials");
                }
            }
        }

        headers
    }

    /// Issue a call against `path` and decode the JSON response as `T`.
    ///
    /// # Errors
    ///
    /// - `ApiError::Transport` if the call cannot complete
    /// - `ApiError::Http` for any non-2xx status
    /// - `ApiError::Decode` if a 2xx body is not valid JSON of the expected shape
    #[instrument(skip_all, fields(method = %options.method, path = %path))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let mut headers = options.headers;
        headers.remove(AUTHORIZATION);
        headers.extend(self.build_headers());

        let mut builder = self.http.request(options.method, &url).headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Request failed");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            warn!(error = %e, "Failed to read response body");
            ApiError::Transport(e.to_string())
        })?;

        if !status.is_success() {
            debug!(
                status = status.as_u16(),
                body = %sanitize_error_body(&String::from_utf8_lossy(&body)),
                "Backend returned error status"
            );
            let message = extract_error_message(&body)
                .unwrap_or_else(|| format!("HTTP error: status {}", status.as_u16()));
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        debug!(status = status.as_u16(), "Request succeeded");

        if body.iter().all(u8::is_ascii_whitespace) {
            warn!("Empty response body");
            return Err(ApiError::Decode("empty response body".to_string()));
        }

        serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "Failed to decode response body");
            ApiError::Decode(e.to_string())
        })
    }

    /// [`request`](Self::request) returning the raw JSON value.
    ///
    /// # Errors
    ///
    /// Same as [`request`](Self::request).
    pub async fn request_json(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        self.request(path, options).await
    }

    /// `POST /users/register`. Does not sign the user in.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call.
    #[instrument(skip_all)]
    pub async fn register(&self, request: &RegisterRequest) -> Result<Value, ApiError> {
        let options = RequestOptions::post().with_json(request)?;
        let response = self.request_json("/users/register", options).await?;
        info!("Registration accepted");
        Ok(response)
    }

    /// `POST /users/login`. On success with a non-empty token, the token
    /// becomes the session token and the returned user is attached to the
    /// session.
    ///
    /// A failed login leaves any existing session untouched.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call, or `ApiError::Storage` if the token cannot
    /// be persisted.
    #[instrument(skip_all)]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let options = RequestOptions::post().with_json(credentials)?;
        let response: LoginResponse = self.request("/users/login", options).await?;

        match response
            .token
            .as_ref()
            .filter(|token| !token.expose_secret().is_empty())
        {
            Some(token) => {
                self.session.set_token(Some(token.clone()))?;
                self.session.set_user(response.user.clone());
                info!("Login succeeded");
            }
            None => {
                warn!("Login succeeded without a token, session unchanged");
            }
        }

        Ok(response)
    }

    /// `POST /users/profile/update`.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call.
    #[instrument(skip_all)]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Value, ApiError> {
        let options = RequestOptions::post().with_json(update)?;
        self.request_json("/users/profile/update", options).await
    }

    /// `POST /recommendations/recommend`, defaulting to the configured radius.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call.
    #[instrument(skip_all, fields(max_distance_km = tracing::field::Empty))]
    pub async fn get_recommendations(
        &self,
        max_distance_km: Option<u32>,
    ) -> Result<RecommendationsResponse, ApiError> {
        let max_distance_km = max_distance_km.unwrap_or(self.default_max_distance_km);
        tracing::Span::current().record("max_distance_km", max_distance_km);

        let options = RequestOptions::post().with_json(&RecommendationsRequest { max_distance_km })?;
        self.request("/recommendations/recommend", options).await
    }

    /// `GET /recommendations/internships?page=N`.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call.
    #[instrument(skip_all, fields(page = page))]
    pub async fn get_internships(&self, page: u32) -> Result<InternshipPage, ApiError> {
        let options = RequestOptions::get().with_query([("page", page.to_string())]);
        self.request("/recommendations/internships", options).await
    }

    /// `GET /recommendations/internships/{id}`. The id is inserted verbatim.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn get_internship_by_id(&self, id: &InternshipId) -> Result<Internship, ApiError> {
        let path = format!("/recommendations/internships/{}", id.as_str());
        self.request(&path, RequestOptions::get()).await
    }

    /// `GET /recommendations/internships/recommended`.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call.
    #[instrument(skip_all)]
    pub async fn get_recommended_internships(&self) -> Result<Value, ApiError> {
        self.request_json("/recommendations/internships/recommended", RequestOptions::get())
            .await
    }

    /// `GET /recommendations/search`.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call.
    #[instrument(skip_all)]
    pub async fn search_internships(&self, params: &SearchParams) -> Result<InternshipPage, ApiError> {
        let options = RequestOptions::get().with_query(params.to_query());
        self.request("/recommendations/search", options).await
    }

    /// `DELETE /recommendations/cache/clear`.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call.
    #[instrument(skip_all)]
    pub async fn clear_cache(&self) -> Result<Value, ApiError> {
        self.request_json("/recommendations/cache/clear", RequestOptions::delete())
            .await
    }

    /// `GET /health`.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call.
    #[instrument(skip_all)]
    pub async fn health_check(&self) -> Result<Value, ApiError> {
        self.request_json("/health", RequestOptions::get()).await
    }

    /// `GET /db-status`.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call.
    #[instrument(skip_all)]
    pub async fn db_status(&self) -> Result<Value, ApiError> {
        self.request_json("/db-status", RequestOptions::get()).await
    }

    /// `GET /redis-status`.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call.
    #[instrument(skip_all)]
    pub async fn redis_status(&self) -> Result<Value, ApiError> {
        self.request_json("/redis-status", RequestOptions::get()).await
    }

    /// Clear the session. No network call is made.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the persisted token cannot be removed.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session.set_token(None)?;
        info!("Logged out");
        Ok(())
    }
}

/// Pull the backend's message out of an error body.
///
/// The `error` field may be a string or an object carrying `message`.
fn extract_error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let message = match value.get("error")? {
        Value::String(message) => message.clone(),
        Value::Object(error) => error.get("message")?.as_str()?.to_string(),
        _ => return None,
    };
    (!message.is_empty()).then_some(message)
}
