//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Use these types for
//! every value that grants access to a user account: passwords typed into the
//! login and registration forms, and the session bearer token returned by the
//! backend.
//!
//! `SecretString` implements `Debug` with redaction, so any struct that derives
//! `Debug` and holds a secret is safe to pass to `tracing` fields or `{:?}`.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct Credentials {
//!     email: String,
//!     password: SecretString,
//! }
//!
//! let creds = Credentials {
//!     email: "ada@example.com".to_string(),
//!     password: SecretString::from("hunter22"),
//! };
//!
//! // Password is redacted in debug output
//! assert!(!format!("{creds:?}").contains("hunter22"));
//!
//! // Reading the value is always explicit
//! assert_eq!(creds.password.expose_secret(), "hunter22");
//! ```
//!
//! # Serde Integration
//!
//! Secrets deserialize transparently, so a login response carrying a `token`
//! field can be decoded straight into a `SecretString`:
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct LoginReply {
//!     token: SecretString,
//! }
//!
//! let reply: LoginReply = serde_json::from_str(r#"{"token": "abc123"}"#).unwrap();
//! assert_eq!(reply.token.expose_secret(), "abc123");
//! ```

// Re-export the main types from secrecy
pub use secrecy::{ExposeSecret, SecretString};

/// Serializes a secret as its plain value.
///
/// `secrecy` deliberately does not implement `Serialize` for `SecretString`.
/// Request bodies that must carry a password opt in field-by-field with
/// `#[serde(serialize_with = "common::secret::serialize_exposed")]`.
///
/// # Errors
///
/// Returns the serializer's error unchanged.
pub fn serialize_exposed<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(secret.expose_secret())
}
