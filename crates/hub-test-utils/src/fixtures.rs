//! JSON fixtures shaped like backend responses.

use serde_json::{json, Value};

/// A fully populated internship listing.
#[must_use]
pub fn internship_json(id: &str) -> Value {
    json!({
        "_id": id,
        "title": "Backend Engineering Intern",
        "company_name": "Acme Analytics",
        "description": "Build data pipelines.",
        "mode": "hybrid",
        "skills": ["Rust", "SQL"],
        "location_city": "Pune",
        "location_state": "Maharashtra",
        "duration_weeks": 12,
        "stipend": 15000,
        "slots_available": 3,
        "min_education": "Undergraduate",
        "company_size": "51-200",
        "sector": "Technology",
        "posted_date": "2024-05-01",
        "application_deadline": "2024-06-01",
        "application_link": "https://jobs.example.com/acme/backend",
        "certificate_provided": true,
        "remote_work_allowed": false
    })
}

/// A listing page holding one internship per id.
#[must_use]
pub fn internship_page_json(current_page: u32, total_pages: u32, ids: &[&str]) -> Value {
    let internships: Vec<Value> = ids.iter().map(|id| internship_json(id)).collect();
    json!({
        "internships": internships,
        "pagination": {
            "current_page": current_page,
            "total_pages": total_pages,
            "total_internships": ids.len() as u64 * u64::from(total_pages),
            "has_next": current_page < total_pages,
            "has_prev": current_page > 1
        }
    })
}

/// A recommendations response with one nearby and one remote internship.
#[must_use]
pub fn recommendations_json() -> Value {
    json!({
        "user_profile": {
            "skills": ["Rust"],
            "sectors": ["Technology"],
            "education": "Undergraduate",
            "location": "Pune"
        },
        "recommendations": {
            "nearby_internships": [internship_json("near-1")],
            "remote_internships": [
                {"_id": "remote-1", "title": "Remote Data Intern", "mode": "remote"}
            ]
        }
    })
}

/// A successful login response carrying `token`.
#[must_use]
pub fn login_success_json(token: &str) -> Value {
    json!({
        "message": "Login successful",
        "token": token,
        "user": {
            "_id": "user-1",
            "username": "ada",
            "email": "ada@example.com"
        }
    })
}

/// An error body in the backend's `{"error": ...}` shape.
#[must_use]
pub fn error_json(message: &str) -> Value {
    json!({ "error": message })
}
