//! Request and response bodies exchanged with the backend.
//!
//! Response types decode leniently: every field the backend may omit is
//! optional or defaulted, and unknown fields are kept in `extra` so callers
//! see the payload unchanged. Records carrying an id accept `_id`, `id` or
//! both; numeric display fields accept numbers or numeric strings and fall
//! back to `None` for anything else.

use common::secret::{serialize_exposed, SecretString};
use common::types::InternshipId;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /users/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    #[serde(serialize_with = "serialize_exposed")]
    pub password: SecretString,
}

/// Body of `POST /users/login`.
///
/// `email` also accepts a username; the backend resolves either.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(serialize_with = "serialize_exposed")]
    pub password: SecretString,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Response of `POST /users/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Session token. Present on every successful login against a
    /// well-behaved backend.
    #[serde(default)]
    pub token: Option<SecretString>,

    #[serde(default)]
    pub user: Option<UserProfile>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Snapshot of the signed-in user as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(remote = "Self")]
pub struct UserProfile {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub skills: Vec<String>,

    #[serde(default)]
    pub sectors: Vec<String>,

    #[serde(default)]
    pub education: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for UserProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        UserProfile::deserialize(with_primary_id(deserializer)?).map_err(de::Error::custom)
    }
}

impl UserProfile {
    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("there")
    }
}

/// Body of `POST /users/profile/update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub skills: Vec<String>,
    pub sectors: Vec<String>,
    pub education: String,
    pub location: String,
}

/// Body of `POST /recommendations/recommend`.
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct RecommendationsRequest {
    pub max_distance_km: u32,
}

/// Response of `POST /recommendations/recommend`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub user_profile: Option<UserProfile>,

    #[serde(default)]
    pub recommendations: Recommendations,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Recommended internships split by reachability.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub nearby_internships: Vec<Internship>,

    #[serde(default)]
    pub remote_internships: Vec<Internship>,
}

impl Recommendations {
    /// Total number of recommended internships.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nearby_internships.len() + self.remote_internships.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One internship listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(remote = "Self")]
pub struct Internship {
    #[serde(rename = "_id", default)]
    pub id: Option<InternshipId>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub company_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Work mode as sent by the backend (`remote`, `hybrid`, `onsite`).
    #[serde(default)]
    pub mode: Option<String>,

    #[serde(default)]
    pub skills: Vec<String>,

    #[serde(default)]
    pub location_city: Option<String>,

    #[serde(default)]
    pub location_state: Option<String>,

    #[serde(default, deserialize_with = "lenient_u32")]
    pub duration_weeks: Option<u32>,

    /// Monthly stipend in rupees.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub stipend: Option<f64>,

    #[serde(default, deserialize_with = "lenient_u32")]
    pub slots_available: Option<u32>,

    #[serde(default)]
    pub min_education: Option<String>,

    #[serde(default)]
    pub company_size: Option<String>,

    #[serde(default)]
    pub sector: Option<String>,

    #[serde(default)]
    pub posted_date: Option<String>,

    #[serde(default)]
    pub application_deadline: Option<String>,

    #[serde(default)]
    pub application_link: Option<String>,

    #[serde(default)]
    pub certificate_provided: Option<bool>,

    #[serde(default)]
    pub remote_work_allowed: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for Internship {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Internship::deserialize(with_primary_id(deserializer)?).map_err(de::Error::custom)
    }
}

impl Internship {
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Internship Position")
    }

    #[must_use]
    pub fn display_company(&self) -> &str {
        self.company_name.as_deref().unwrap_or("Company Name")
    }

    #[must_use]
    pub fn display_mode(&self) -> &str {
        self.mode.as_deref().unwrap_or("Not specified")
    }

    /// `City, State`, just the city, or a placeholder.
    #[must_use]
    pub fn location_label(&self) -> String {
        match (self.location_city.as_deref(), self.location_state.as_deref()) {
            (Some(city), Some(state)) => format!("{city}, {state}"),
            (Some(city), None) => city.to_string(),
            _ => "Location not specified".to_string(),
        }
    }

    #[must_use]
    pub fn duration_label(&self) -> String {
        match self.duration_weeks {
            Some(weeks) if weeks > 0 => format!("{weeks} weeks"),
            _ => "Duration not specified".to_string(),
        }
    }

    /// Stipend formatted with thousands separators, or `Unpaid`.
    #[must_use]
    pub fn stipend_label(&self) -> String {
        match self.stipend {
            Some(amount) if amount > 0.0 => format!("₹{}", group_thousands(amount)),
            _ => "Unpaid".to_string(),
        }
    }
}

/// Read a record and settle its id under `_id`.
///
/// `_id` wins when both spellings are present and `id` is then left for
/// `extra`. A lone `id` is copied to `_id`. Numeric ids become strings.
fn with_primary_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
    let mut record = Map::<String, Value>::deserialize(deserializer)?;

    let primary = match record.get("_id").or_else(|| record.get("id")) {
        Some(Value::Number(n)) => Some(Value::String(n.to_string())),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.clone()),
    };
    if let Some(primary) = primary {
        record.insert("_id".to_string(), primary);
    }

    Ok(Value::Object(record))
}

/// A number or numeric string; anything else reads as absent.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite()))
}

/// A whole, non-negative count that fits in `u32`; anything else reads as
/// absent.
fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    })
}

/// Formats a non-negative amount with comma thousands separators, keeping up
/// to two decimal places when present.
fn group_thousands(amount: f64) -> String {
    let rendered = format!("{amount:.2}");
    let (whole, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let digits: Vec<char> = whole.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        grouped
    } else {
        format!("{grouped}.{fraction}")
    }
}

/// Pagination block of listing and search responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub current_page: u32,

    #[serde(default)]
    pub total_pages: u32,

    #[serde(default)]
    pub total_internships: u64,

    #[serde(default)]
    pub has_next: bool,

    #[serde(default)]
    pub has_prev: bool,
}

/// Response of the listing and search endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InternshipPage {
    #[serde(default)]
    pub internships: Vec<Internship>,

    #[serde(default)]
    pub pagination: Pagination,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InternshipPage {
    /// Page number to request for "next", if there is one.
    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        self.pagination
            .has_next
            .then(|| self.pagination.current_page.saturating_add(1))
    }

    /// Page number to request for "previous", if there is one.
    #[must_use]
    pub fn prev_page(&self) -> Option<u32> {
        (self.pagination.has_prev && self.pagination.current_page > 1)
            .then(|| self.pagination.current_page - 1)
    }

    /// Whether `page` lies within the advertised page range.
    #[must_use]
    pub fn contains_page(&self, page: u32) -> bool {
        page >= 1 && page <= self.pagination.total_pages
    }
}

/// Query parameters for `GET /recommendations/search`.
///
/// `q` and `page` are the parameters the backend is known to accept; further
/// pairs are forwarded verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub extra: Vec<(String, String)>,
}

impl SearchParams {
    #[must_use]
    pub fn query(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Query pairs in the order they are sent.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.extra.len() + 2);
        if let Some(q) = &self.q {
            pairs.push(("q".to_string(), q.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        pairs.extend(self.extra.iter().cloned());
        pairs
    }
}
