//! Plain-text rendering of pages and backend responses.

use crate::navigation::{AuthMode, Page};
use hub_client::{AuthState, Internship, InternshipPage, RecommendationsResponse};
use serde_json::Value;

/// One-line header naming the page and who is signed in.
#[must_use]
pub fn page_header(page: &Page, auth: &AuthState, mode: AuthMode) -> String {
    let who = if auth.is_authenticated {
        match &auth.user {
            Some(user) => format!("signed in as {}", user.display_name()),
            None => "signed in".to_string(),
        }
    } else {
        "not signed in".to_string()
    };

    match page {
        Page::Auth => format!("== auth ({mode}) == [{who}]"),
        page => format!("== {page} == [{who}]"),
    }
}

/// What a page shows before any data is loaded.
#[must_use]
pub fn page_body(page: &Page, mode: AuthMode) -> String {
    match page {
        Page::Home => "Find internships that match your skills. Try `internships`, `search <query>` or `recommend`.".to_string(),
        Page::Auth => match mode {
            AuthMode::Login => "Sign in with `login <email-or-username> <password>` (or `register` to create an account).".to_string(),
            AuthMode::Register => "Create an account with `register <username> <email> <password> <confirm>` (or `login` to sign in).".to_string(),
        },
        Page::Profile => "Update your profile with `profile skills=a,b sectors=c education=... location=...`.".to_string(),
        Page::Recommendations => "Load recommendations with `recommend [km]`.".to_string(),
        Page::Internships => "Browse with `internships [page]`.".to_string(),
        Page::InternshipDetail(id) => format!("Load details with `show {id}`."),
    }
}

/// Compact one-line summary of a listing.
#[must_use]
pub fn internship_line(internship: &Internship) -> String {
    let id = internship
        .id
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    format!(
        "[{id}] {} at {} | {} | {} | {}",
        internship.display_title(),
        internship.display_company(),
        internship.location_label(),
        internship.display_mode(),
        internship.stipend_label(),
    )
}

/// Full detail view of a listing.
#[must_use]
pub fn internship_detail(internship: &Internship) -> String {
    let mut lines = vec![
        internship.display_title().to_string(),
        format!("  Company:    {}", internship.display_company()),
        format!("  Location:   {}", internship.location_label()),
        format!("  Mode:       {}", internship.display_mode()),
        format!("  Duration:   {}", internship.duration_label()),
        format!("  Stipend:    {}", internship.stipend_label()),
    ];

    if let Some(sector) = &internship.sector {
        lines.push(format!("  Sector:     {sector}"));
    }
    if !internship.skills.is_empty() {
        lines.push(format!("  Skills:     {}", internship.skills.join(", ")));
    }
    if let Some(education) = &internship.min_education {
        lines.push(format!("  Education:  {education}"));
    }
    if let Some(slots) = internship.slots_available {
        lines.push(format!("  Openings:   {slots}"));
    }
    if let Some(deadline) = &internship.application_deadline {
        lines.push(format!("  Deadline:   {deadline}"));
    }
    if internship.certificate_provided == Some(true) {
        lines.push("  Certificate provided".to_string());
    }
    if let Some(description) = &internship.description {
        lines.push(format!("\n{description}"));
    }
    if let Some(link) = &internship.application_link {
        lines.push(format!("\nApply: {link}"));
    }

    lines.join("\n").trim_end().to_string()
}

/// A listing or search results page with its pagination footer.
#[must_use]
pub fn internship_page(page: &InternshipPage, next_command: &str) -> String {
    if page.internships.is_empty() {
        return "No internships found.".to_string();
    }

    let pagination = &page.pagination;
    let mut footer = format!(
        "Page {} of {} ({} internships)",
        pagination.current_page, pagination.total_pages, pagination.total_internships
    );
    if let Some(prev) = page.prev_page() {
        footer.push_str(&format!(" | prev: `{next_command} {prev}`"));
    }
    if let Some(next) = page.next_page() {
        footer.push_str(&format!(" | next: `{next_command} {next}`"));
    }

    let mut lines: Vec<String> = page.internships.iter().map(internship_line).collect();
    lines.push(footer);
    lines.join("\n")
}

/// Recommendations split into nearby and remote sections.
#[must_use]
pub fn recommendations(response: &RecommendationsResponse) -> String {
    let recs = &response.recommendations;
    if recs.is_empty() {
        return "No recommendations yet. Update your profile with more skills and sectors."
            .to_string();
    }

    let mut lines = Vec::with_capacity(recs.len() + 2);
    for (title, list) in [
        ("Nearby internships", &recs.nearby_internships),
        ("Remote internships", &recs.remote_internships),
    ] {
        if list.is_empty() {
            continue;
        }
        lines.push(format!("{title} ({}):", list.len()));
        lines.extend(list.iter().map(|internship| format!("  {}", internship_line(internship))));
    }
    lines.join("\n")
}

/// Pretty-printed JSON for opaque responses.
#[must_use]
pub fn json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
