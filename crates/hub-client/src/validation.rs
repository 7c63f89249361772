//! Form validation that runs before any network call.
//!
//! A form that fails validation never reaches the [`ApiClient`]; all field
//! problems are reported together so a screen can mark every bad field at once.
//!
//! [`ApiClient`]: crate::ApiClient

use crate::models::{LoginRequest, ProfileUpdate, RegisterRequest};
use common::secret::{ExposeSecret, SecretString};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Minimum username length for registration.
pub const MIN_USERNAME_LEN: usize = 3;

/// Minimum password length for registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Loose email shape check: something, `@`, something, `.`, something.
#[allow(clippy::expect_used)]
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("Email pattern is a valid regex"));

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All problems found in a submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    /// Message for `field`, if that field was rejected.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.fields.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn reject(&mut self, field: &'static str, message: &str) {
        self.0.push(FieldError {
            field,
            message: message.to_string(),
        });
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError { fields: self.0 })
        }
    }
}

/// Registration form as typed by the user.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl RegistrationForm {
    /// Check every field and build the request body.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing every rejected field.
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        let mut errors = Collector::default();

        if self.username.trim().is_empty() {
            errors.reject("username", "Username is required");
        } else if self.username.chars().count() < MIN_USERNAME_LEN {
            errors.reject("username", "Username must be at least 3 characters");
        }

        if self.email.trim().is_empty() {
            errors.reject("email", "Email is required");
        } else if !EMAIL_PATTERN.is_match(&self.email) {
            errors.reject("email", "Please enter a valid email address");
        }

        let password = self.password.expose_secret();
        if password.is_empty() {
            errors.reject("password", "Password is required");
        } else if password.chars().count() < MIN_PASSWORD_LEN {
            errors.reject("password", "Password must be at least 6 characters");
        }

        let confirm = self.confirm_password.expose_secret();
        if confirm.is_empty() {
            errors.reject("confirm_password", "Please confirm your password");
        } else if confirm != password {
            errors.reject("confirm_password", "Passwords do not match");
        }

        errors.finish(RegisterRequest {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

/// Login form as typed by the user.
#[derive(Debug, Clone)]
pub struct LoginForm {
    /// Email address or username.
    pub identifier: String,
    pub password: SecretString,
}

impl LoginForm {
    /// Check that both fields are filled and build the request body.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing every empty field.
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let mut errors = Collector::default();

        if self.identifier.trim().is_empty() {
            errors.reject("email", "Email or username is required");
        }
        if self.password.expose_secret().is_empty() {
            errors.reject("password", "Password is required");
        }

        errors.finish(LoginRequest {
            email: self.identifier.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

impl ProfileUpdate {
    /// Trim entries, drop empty ones and remove duplicates, keeping the first
    /// occurrence of each skill and sector.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            skills: dedup_trimmed(&self.skills),
            sectors: dedup_trimmed(&self.sectors),
            education: self.education.trim().to_string(),
            location: self.location.trim().to_string(),
        }
    }

    /// Add a skill unless it is blank or already listed.
    ///
    /// Returns whether the list changed.
    pub fn add_skill(&mut self, skill: &str) -> bool {
        push_unique(&mut self.skills, skill)
    }

    /// Add a sector unless it is blank or already listed.
    ///
    /// Returns whether the list changed.
    pub fn add_sector(&mut self, sector: &str) -> bool {
        push_unique(&mut self.sectors, sector)
    }
}

fn push_unique(list: &mut Vec<String>, entry: &str) -> bool {
    let entry = entry.trim();
    if entry.is_empty() || list.iter().any(|existing| existing == entry) {
        return false;
    }
    list.push(entry.to_string());
    true
}

fn dedup_trimmed(entries: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        push_unique(&mut out, entry);
    }
    out
}
