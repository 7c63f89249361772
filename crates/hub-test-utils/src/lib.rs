//! # Hub Test Utilities
//!
//! Shared test utilities for the Internship Hub client crates.
//!
//! This crate provides:
//! - A mocked backend (`MockBackend`, built on wiremock)
//! - JSON fixtures shaped like real backend responses
//! - Helpers for clients over in-memory sessions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hub_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let backend = MockBackend::start().await;
//!     backend.mock_login_success("abc123").await;
//!
//!     let (client, store) = backend.memory_client();
//!     client.login(&LoginRequest::new("ada@example.com", "pw")).await?;
//!
//!     assert_eq!(store.stored_token().as_deref(), Some("abc123"));
//!     Ok(())
//! }
//! ```

pub mod fixtures;
pub mod mock_backend;

// Re-export commonly used items
pub use fixtures::*;
pub use mock_backend::*;
