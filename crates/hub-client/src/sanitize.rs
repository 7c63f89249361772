//! Redaction of response bodies before they reach the logs.
//!
//! Error bodies are only ever logged at debug level, and only after passing
//! through [`sanitize_error_body`].

use regex::Regex;
use std::sync::LazyLock;

/// Maximum length for an error body in log output.
pub const MAX_ERROR_BODY_LEN: usize = 256;

/// Regex pattern for JWT tokens (header.payload.signature).
#[allow(clippy::expect_used)]
static JWT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"eyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+(?:\.[A-Za-z0-9_-]*)?")
        .expect("JWT pattern is a valid regex")
});

/// Regex pattern for bearer credentials in text.
#[allow(clippy::expect_used)]
static BEARER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)bearer\s+[A-Za-z0-9._~+/=-]+").expect("Bearer pattern is a valid regex")
});

/// Regex pattern for `"token": "<value>"` pairs in JSON bodies.
#[allow(clippy::expect_used)]
static TOKEN_FIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"("(?:token|access_token|password)"\s*:\s*)"[^"]*""#)
        .expect("Token field pattern is a valid regex")
});

/// Sanitize a response body for logging.
///
/// - Removes bearer credentials (first, so `Bearer <JWT>` goes as a whole)
/// - Removes standalone JWTs
/// - Blanks `token`, `access_token` and `password` JSON values
/// - Truncates to [`MAX_ERROR_BODY_LEN`] bytes on a character boundary
#[must_use]
pub fn sanitize_error_body(body: &str) -> String {
    let sanitized = BEARER_PATTERN.replace_all(body, "[BEARER_REDACTED]");
    let sanitized = JWT_PATTERN.replace_all(&sanitized, "[JWT_REDACTED]");
    let sanitized = TOKEN_FIELD_PATTERN.replace_all(&sanitized, r#"$1"[REDACTED]""#);

    if sanitized.len() > MAX_ERROR_BODY_LEN {
        let mut end = MAX_ERROR_BODY_LEN;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", sanitized.get(..end).unwrap_or_default())
    } else {
        sanitized.into_owned()
    }
}
