//! Navigation and the authentication gate.
//!
//! The [`Navigator`] holds the current page and re-applies the gating rule
//! on every navigation and every read of the current page: while the session
//! is unauthenticated, a protected page is replaced by [`Page::Auth`]. A
//! logout therefore takes effect on the next read, without a navigation call.

use common::types::InternshipId;
use hub_client::AuthReceiver;
use std::fmt;
use tracing::debug;

/// Screens of the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Auth,
    Profile,
    Recommendations,
    Internships,
    InternshipDetail(InternshipId),
}

impl Page {
    /// Pages that require an authenticated session.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        matches!(self, Page::Profile | Page::Recommendations)
    }

    /// Look up a page by the name shown in [`Display`](fmt::Display).
    ///
    /// Detail pages are written `internship/<id>`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "home" => Some(Page::Home),
            "auth" | "login" => Some(Page::Auth),
            "profile" => Some(Page::Profile),
            "recommendations" => Some(Page::Recommendations),
            "internships" => Some(Page::Internships),
            _ => name
                .trim()
                .strip_prefix("internship/")
                .filter(|id| !id.is_empty())
                .map(|id| Page::InternshipDetail(InternshipId::new(id))),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Home => f.write_str("home"),
            Page::Auth => f.write_str("auth"),
            Page::Profile => f.write_str("profile"),
            Page::Recommendations => f.write_str("recommendations"),
            Page::Internships => f.write_str("internships"),
            Page::InternshipDetail(id) => write!(f, "internship/{id}"),
        }
    }
}

/// Which form the auth page shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Login => f.write_str("login"),
            AuthMode::Register => f.write_str("register"),
        }
    }
}

/// Current page plus the auth gate over it.
#[derive(Debug)]
pub struct Navigator {
    page: Page,
    auth_mode: AuthMode,
    auth: AuthReceiver,
}

impl Navigator {
    /// Start on [`Page::Home`] in login mode.
    #[must_use]
    pub fn new(auth: AuthReceiver) -> Self {
        Self {
            page: Page::Home,
            auth_mode: AuthMode::default(),
            auth,
        }
    }

    /// Request `page`, then apply the gate.
    ///
    /// Returns the page actually shown.
    pub fn navigate_to(&mut self, page: Page) -> &Page {
        debug!(from = %self.page, to = %page, "Navigating");
        self.page = page;
        self.enforce();
        &self.page
    }

    /// Go to the auth page showing the `mode` form.
    pub fn navigate_to_auth(&mut self, mode: AuthMode) -> &Page {
        self.auth_mode = mode;
        self.navigate_to(Page::Auth)
    }

    /// Switch the auth form without navigating.
    pub fn set_auth_mode(&mut self, mode: AuthMode) {
        self.auth_mode = mode;
    }

    /// Apply the gating rule. Returns true if the page was replaced.
    pub fn enforce(&mut self) -> bool {
        if self.page.is_protected() && !self.auth.is_authenticated() {
            debug!(page = %self.page, "Protected page requires login");
            self.page = Page::Auth;
            return true;
        }
        false
    }

    /// Current page, with the gate applied first.
    pub fn current_page(&mut self) -> &Page {
        self.enforce();
        &self.page
    }

    #[must_use]
    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }
}
