//! Common data types for Internship Hub components.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend identifier of an internship listing.
///
/// The backend issues opaque string identifiers (document ids), so this
/// wraps a `String` rather than a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InternshipId(pub String);

impl InternshipId {
    /// Create an identifier from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InternshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InternshipId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for InternshipId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
