//! API client integration tests.
//!
//! Exercises the access layer against a mocked backend: headers, request
//! shapes for every operation, failure normalization and session persistence.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::Result;
use common::config::ClientConfig;
use common::secret::{ExposeSecret, SecretString};
use common::types::InternshipId;
use hub_client::{
    ApiClient, ApiError, FileTokenStore, LoginRequest, MemoryTokenStore, ProfileUpdate,
    RegisterRequest, RequestOptions, SearchParams, Session, TokenStore,
};
use hub_test_utils::{error_json, internship_json, recommendations_json, MockBackend};
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn credentials() -> LoginRequest {
    LoginRequest::new("ada@example.com", "hunter22")
}

// ============================================================================
// Login and session
// ============================================================================

#[tokio::test]
async fn test_login_success_sets_bearer_header() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_login_success("abc123").await;
    let (client, store) = backend.memory_client();

    let response = client.login(&credentials()).await?;

    assert_eq!(response.token.unwrap().expose_secret(), "abc123");
    assert_eq!(client.build_headers().get(AUTHORIZATION).unwrap(), "Bearer abc123");
    assert_eq!(store.stored_token().as_deref(), Some("abc123"));

    let state = client.session().auth_state();
    assert!(state.is_authenticated);
    assert_eq!(state.user.unwrap().username.as_deref(), Some("ada"));
    Ok(())
}

#[tokio::test]
async fn test_login_sends_credentials_without_auth_header() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_login_success("abc123").await;
    let (client, _store) = backend.memory_client();

    client.login(&credentials()).await?;

    let request = backend.single_request().await;
    assert_eq!(request.method.as_str(), "POST");
    assert_eq!(request.url.path(), "/users/login");
    assert!(request.headers.get("authorization").is_none());
    assert_eq!(
        request.headers.get("content-type").unwrap(),
        "application/json"
    );
    let body: Value = request.body_json()?;
    assert_eq!(
        body,
        json!({"email": "ada@example.com", "password": "hunter22"})
    );
    Ok(())
}

#[tokio::test]
async fn test_login_rejected_leaves_session_unchanged() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_login_rejected(401, "invalid credentials").await;
    let (client, store) = backend.memory_client_with(MemoryTokenStore::with_token("existing"));

    let err = client.login(&credentials()).await.unwrap_err();

    assert!(matches!(err, ApiError::Http { .. }), "got {err:?}");
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "invalid credentials");
    assert_eq!(err.user_message(), "invalid credentials");
    assert_eq!(store.stored_token().as_deref(), Some("existing"));
    assert_eq!(
        client.session().token().unwrap().expose_secret(),
        "existing"
    );
    Ok(())
}

#[tokio::test]
async fn test_login_without_token_leaves_session_unchanged() -> Result<()> {
    let backend = MockBackend::start().await;
    backend
        .mock_json("POST", "/users/login", 200, json!({"message": "Check your inbox"}))
        .await;
    let (client, store) = backend.memory_client();

    let response = client.login(&credentials()).await?;

    assert_eq!(response.message.as_deref(), Some("Check your inbox"));
    assert!(!client.session().is_authenticated());
    assert_eq!(store.stored_token(), None);
    Ok(())
}

#[tokio::test]
async fn test_logout_clears_header_and_storage() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_login_success("abc123").await;
    let (client, store) = backend.memory_client();
    client.login(&credentials()).await?;

    client.logout()?;

    assert!(client.build_headers().get(AUTHORIZATION).is_none());
    assert_eq!(store.stored_token(), None);
    assert!(!client.session().is_authenticated());
    // login only
    assert_eq!(backend.received_requests().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_persisted_token_hydrates_without_network() -> Result<()> {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir()?;

    let first = Session::hydrate(Arc::new(FileTokenStore::new(dir.path())))?;
    first.set_token(Some(SecretString::from("x")))?;
    drop(first);

    let session = Arc::new(Session::hydrate(Arc::new(FileTokenStore::new(dir.path())))?);
    let client = backend.client(Arc::clone(&session));

    assert!(session.is_authenticated());
    assert_eq!(client.build_headers().get(AUTHORIZATION).unwrap(), "Bearer x");
    assert!(backend.received_requests().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_login_with_empty_token_persists_nothing() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_login_success("").await;
    let dir = tempfile::tempdir()?;
    let store = FileTokenStore::new(dir.path());
    let client = backend.client(Arc::new(Session::hydrate(Arc::new(store.clone()))?));

    client.login(&credentials()).await?;

    assert!(!client.session().is_authenticated());
    assert!(client.build_headers().get(AUTHORIZATION).is_none());
    assert!(!store.path().exists());
    let reloaded = Session::hydrate(Arc::new(FileTokenStore::new(dir.path())))?;
    assert!(!reloaded.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn test_login_token_survives_restart_unchanged() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_login_success(" abc123 ").await;
    let dir = tempfile::tempdir()?;
    let client = backend.client(Arc::new(Session::hydrate(Arc::new(FileTokenStore::new(
        dir.path(),
    )))?));

    client.login(&credentials()).await?;
    let reloaded = Session::hydrate(Arc::new(FileTokenStore::new(dir.path())))?;

    assert!(reloaded.is_authenticated());
    assert_eq!(
        reloaded.token().unwrap().expose_secret(),
        client.session().token().unwrap().expose_secret()
    );
    Ok(())
}

#[tokio::test]
async fn test_logout_removes_persisted_file() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_login_success("abc123").await;
    let dir = tempfile::tempdir()?;
    let store = FileTokenStore::new(dir.path());
    let client = backend.client(Arc::new(Session::hydrate(Arc::new(store.clone()))?));

    client.login(&credentials()).await?;
    assert!(store.path().exists());

    client.logout()?;
    assert!(!store.path().exists());
    assert!(store.load()?.is_none());
    Ok(())
}

// ============================================================================
// Headers
// ============================================================================

#[tokio::test]
async fn test_authenticated_calls_send_bearer_token() -> Result<()> {
    let backend = MockBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header("authorization", "Bearer abc123"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(backend.server())
        .await;
    let (client, _store) = backend.memory_client_with(MemoryTokenStore::with_token("abc123"));

    let health = client.health_check().await?;

    assert_eq!(health["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn test_caller_headers_cannot_override_built_headers() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_json("GET", "/health", 200, json!({})).await;
    let (client, _store) = backend.memory_client_with(MemoryTokenStore::with_token("abc123"));

    let options = RequestOptions::get()
        .with_header(AUTHORIZATION, HeaderValue::from_static("Bearer forged"))
        .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
        .with_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("req-1"),
        );
    client.request_json("/health", options).await?;

    let request = backend.single_request().await;
    assert_eq!(request.headers.get("authorization").unwrap(), "Bearer abc123");
    assert_eq!(
        request.headers.get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(request.headers.get("x-request-id").unwrap(), "req-1");
    Ok(())
}

#[tokio::test]
async fn test_caller_authorization_dropped_while_logged_out() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_json("GET", "/health", 200, json!({})).await;
    let (client, _store) = backend.memory_client();

    let options =
        RequestOptions::get().with_header(AUTHORIZATION, HeaderValue::from_static("Bearer forged"));
    client.request_json("/health", options).await?;

    let request = backend.single_request().await;
    assert!(request.headers.get("authorization").is_none());
    Ok(())
}

// ============================================================================
// Domain operations
// ============================================================================

#[tokio::test]
async fn test_register_posts_form_and_keeps_session_unauthenticated() -> Result<()> {
    let backend = MockBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/users/register"))
        .and(body_json(json!({
            "username": "ada",
            "email": "ada@example.com",
            "password": "secret1"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"message": "User registered"})),
        )
        .mount(backend.server())
        .await;
    let (client, _store) = backend.memory_client();

    let response = client
        .register(&RegisterRequest {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: SecretString::from("secret1"),
        })
        .await?;

    assert_eq!(response["message"], "User registered");
    assert!(!client.session().is_authenticated());
    Ok(())
}

#[tokio::test]
async fn test_update_profile_posts_update() -> Result<()> {
    let backend = MockBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/users/profile/update"))
        .and(header("authorization", "Bearer abc123"))
        .and(body_json(json!({
            "skills": ["Rust", "SQL"],
            "sectors": ["Technology"],
            "education": "Undergraduate",
            "location": "Pune"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Profile updated"})))
        .mount(backend.server())
        .await;
    let (client, _store) = backend.memory_client_with(MemoryTokenStore::with_token("abc123"));

    let response = client
        .update_profile(&ProfileUpdate {
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            sectors: vec!["Technology".to_string()],
            education: "Undergraduate".to_string(),
            location: "Pune".to_string(),
        })
        .await?;

    assert_eq!(response["message"], "Profile updated");
    Ok(())
}

#[tokio::test]
async fn test_get_recommendations_uses_default_radius() -> Result<()> {
    let backend = MockBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/recommendations/recommend"))
        .and(body_json(json!({"max_distance_km": 150})))
        .respond_with(ResponseTemplate::new(200).set_body_json(recommendations_json()))
        .mount(backend.server())
        .await;
    let (client, _store) = backend.memory_client_with(MemoryTokenStore::with_token("abc123"));

    let response = client.get_recommendations(None).await?;

    assert_eq!(response.recommendations.len(), 2);
    assert_eq!(
        response
            .recommendations
            .nearby_internships
            .first()
            .unwrap()
            .stipend_label(),
        "₹15,000"
    );
    Ok(())
}

#[tokio::test]
async fn test_get_recommendations_explicit_radius() -> Result<()> {
    let backend = MockBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/recommendations/recommend"))
        .and(body_json(json!({"max_distance_km": 40})))
        .respond_with(ResponseTemplate::new(200).set_body_json(recommendations_json()))
        .mount(backend.server())
        .await;
    let (client, _store) = backend.memory_client();

    let response = client.get_recommendations(Some(40)).await?;

    assert!(!response.recommendations.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_get_recommendations_respects_configured_radius() -> Result<()> {
    let backend = MockBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/recommendations/recommend"))
        .and(body_json(json!({"max_distance_km": 75})))
        .respond_with(ResponseTemplate::new(200).set_body_json(recommendations_json()))
        .mount(backend.server())
        .await;
    let config = ClientConfig {
        default_max_distance_km: 75,
        ..backend.config()
    };
    let client = ApiClient::new(&config, Arc::new(Session::ephemeral()))?;

    client.get_recommendations(None).await?;
    Ok(())
}

#[tokio::test]
async fn test_get_internships_sends_page_query() -> Result<()> {
    let backend = MockBackend::start().await;
    backend.mock_internships_page(2, 3, &["a", "b"]).await;
    let (client, _store) = backend.memory_client();

    let page = client.get_internships(2).await?;

    assert_eq!(page.internships.len(), 2);
    assert_eq!(page.pagination.current_page, 2);
    assert_eq!(page.next_page(), Some(3));
    assert_eq!(page.prev_page(), Some(1));
    Ok(())
}

#[tokio::test]
async fn test_get_internship_by_id_inserts_id_in_path() -> Result<()> {
    let backend = MockBackend::start().await;
    backend
        .mock_json(
            "GET",
            "/recommendations/internships/665f1c2a",
            200,
            internship_json("665f1c2a"),
        )
        .await;
    let (client, _store) = backend.memory_client();

    let internship = client
        .get_internship_by_id(&InternshipId::new("665f1c2a"))
        .await?;

    assert_eq!(internship.id, Some(InternshipId::new("665f1c2a")));
    assert_eq!(internship.display_company(), "Acme Analytics");
    assert_eq!(internship.location_label(), "Pune, Maharashtra");
    Ok(())
}

#[tokio::test]
async fn test_get_internship_by_id_not_found() -> Result<()> {
    let backend = MockBackend::start().await;
    backend
        .mock_json(
            "GET",
            "/recommendations/internships/missing",
            404,
            error_json("Internship not found"),
        )
        .await;
    let (client, _store) = backend.memory_client();

    let err = client
        .get_internship_by_id(&InternshipId::new("missing"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Internship not found");
    Ok(())
}

#[tokio::test]
async fn test_search_internships_sends_query_params() -> Result<()> {
    let backend = MockBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/recommendations/search"))
        .and(query_param("q", "data science"))
        .and(query_param("page", "2"))
        .and(query_param("mode", "remote"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            hub_test_utils::internship_page_json(2, 2, &["s1"]),
        ))
        .mount(backend.server())
        .await;
    let (client, _store) = backend.memory_client();

    let params = SearchParams::query("data science")
        .with_page(2)
        .with_param("mode", "remote");
    let page = client.search_internships(&params).await?;

    assert_eq!(page.internships.len(), 1);
    assert_eq!(page.next_page(), None);
    Ok(())
}

#[tokio::test]
async fn test_get_recommended_internships() -> Result<()> {
    let backend = MockBackend::start().await;
    backend
        .mock_json(
            "GET",
            "/recommendations/internships/recommended",
            200,
            json!({"internships": []}),
        )
        .await;
    let (client, _store) = backend.memory_client();

    let response = client.get_recommended_internships().await?;

    assert_eq!(response["internships"], json!([]));
    Ok(())
}

#[tokio::test]
async fn test_clear_cache_uses_delete() -> Result<()> {
    let backend = MockBackend::start().await;
    backend
        .mock_json(
            "DELETE",
            "/recommendations/cache/clear",
            200,
            json!({"message": "Cache cleared"}),
        )
        .await;
    let (client, _store) = backend.memory_client();

    let response = client.clear_cache().await?;

    assert_eq!(response["message"], "Cache cleared");
    Ok(())
}

#[tokio::test]
async fn test_status_endpoints() -> Result<()> {
    let backend = MockBackend::start().await;
    backend
        .mock_json("GET", "/db-status", 200, json!({"connected": true}))
        .await;
    backend
        .mock_json("GET", "/redis-status", 200, json!({"connected": false}))
        .await;
    let (client, _store) = backend.memory_client();

    assert_eq!(client.db_status().await?["connected"], true);
    assert_eq!(client.redis_status().await?["connected"], false);
    Ok(())
}

// ============================================================================
// Failure normalization
// ============================================================================

#[tokio::test]
async fn test_non_json_error_body_uses_generic_message() -> Result<()> {
    let backend = MockBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(backend.server())
        .await;
    let (client, _store) = backend.memory_client();

    let err = client.health_check().await.unwrap_err();

    assert!(matches!(err, ApiError::Http { .. }), "got {err:?}");
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "HTTP error: status 502");
    Ok(())
}

#[tokio::test]
async fn test_error_object_message_is_surfaced() -> Result<()> {
    let backend = MockBackend::start().await;
    backend
        .mock_json(
            "POST",
            "/users/profile/update",
            400,
            json!({"error": {"message": "Location is required"}}),
        )
        .await;
    let (client, _store) = backend.memory_client();

    let err = client
        .update_profile(&ProfileUpdate::default())
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Location is required");
    Ok(())
}

#[tokio::test]
async fn test_listing_with_loose_field_types_decodes() -> Result<()> {
    let backend = MockBackend::start().await;
    backend
        .mock_json(
            "GET",
            "/recommendations/internships",
            200,
            json!({
                "internships": [
                    {"_id": "i1", "id": "i1", "title": "Data Intern", "stipend": "10000"},
                    {"_id": "i2", "slots_available": -2, "duration_weeks": 6.5}
                ],
                "pagination": {"current_page": 1, "total_pages": 1, "total_internships": 2}
            }),
        )
        .await;
    let (client, _store) = backend.memory_client();

    let page = client.get_internships(1).await?;

    let first = page.internships.first().unwrap();
    assert_eq!(first.id, Some(InternshipId::new("i1")));
    assert_eq!(first.stipend, Some(10000.0));
    let second = page.internships.last().unwrap();
    assert_eq!(second.slots_available, None);
    assert_eq!(second.duration_weeks, None);
    Ok(())
}

#[tokio::test]
async fn test_invalid_json_success_body_is_decode_error() -> Result<()> {
    let backend = MockBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/recommendations/internships"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(backend.server())
        .await;
    let (client, _store) = backend.memory_client();

    let err = client.get_internships(1).await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn test_wrong_shape_success_body_is_decode_error() -> Result<()> {
    let backend = MockBackend::start().await;
    backend
        .mock_json(
            "GET",
            "/recommendations/internships",
            200,
            json!({"internships": "nope"}),
        )
        .await;
    let (client, _store) = backend.memory_client();

    let err = client.get_internships(1).await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn test_empty_success_body_is_decode_error() -> Result<()> {
    let backend = MockBackend::start().await;
    Mock::given(method("DELETE"))
        .and(path("/recommendations/cache/clear"))
        .respond_with(ResponseTemplate::new(200))
        .mount(backend.server())
        .await;
    let (client, _store) = backend.memory_client();

    let err = client.clear_cache().await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
    assert_eq!(err.status(), None);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() -> Result<()> {
    // Reserve a port, then free it so nothing is listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    let config = ClientConfig::for_base_url(&format!("http://{addr}"))?;
    let store = MemoryTokenStore::with_token("abc123");
    let client = ApiClient::new(&config, Arc::new(Session::hydrate(Arc::new(store.clone()))?))?;

    let err = client.login(&credentials()).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    assert_eq!(store.stored_token().as_deref(), Some("abc123"));
    Ok(())
}
