//! Internship Hub API access layer.
//!
//! Single choke point for all communication with the Internship Hub backend.
//! The crate owns the persisted session token, builds request headers, performs
//! HTTP calls and normalizes every outcome into [`ApiError`] or a decoded body.
//!
//! # Components
//!
//! - [`Session`]: the one authentication record of a running client, hydrated
//!   from a [`TokenStore`] at startup and observable through [`AuthReceiver`]
//! - [`ApiClient`]: header construction, the generic `request` call and the
//!   named backend operations (login, recommendations, listings, ...)
//! - [`validation`]: form checks that run before any network call
//!
//! # Example
//!
//! ```rust,ignore
//! use common::config::ClientConfig;
//! use hub_client::{ApiClient, FileTokenStore, LoginRequest, Session};
//! use std::sync::Arc;
//!
//! let config = ClientConfig::from_env()?;
//! let store = Arc::new(FileTokenStore::new(&config.storage_dir));
//! let session = Arc::new(Session::hydrate(store)?);
//! let client = ApiClient::new(&config, Arc::clone(&session))?;
//!
//! client.login(&LoginRequest::new("ada@example.com", "hunter22")).await?;
//! let page = client.get_internships(1).await?;
//! ```

#![warn(clippy::pedantic)]

pub mod client;
pub mod errors;
pub mod models;
pub mod sanitize;
pub mod session;
pub mod storage;
pub mod validation;

pub use client::{ApiClient, RequestOptions};
pub use errors::{ApiError, StorageError};
pub use models::{
    Internship, InternshipPage, LoginRequest, LoginResponse, Pagination, ProfileUpdate,
    Recommendations, RecommendationsResponse, RegisterRequest, SearchParams, UserProfile,
};
pub use session::{AuthReceiver, AuthState, Session};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore, AUTH_TOKEN_KEY};
pub use validation::{FieldError, LoginForm, RegistrationForm, ValidationError};
