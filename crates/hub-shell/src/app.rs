//! Screen flows: the glue between commands, the navigator and the API client.
//!
//! Each flow validates input first, calls the backend, then applies the
//! follow-up navigation. Failures are returned to the caller for rendering;
//! they never change the page.

use crate::commands::{Command, HELP_TEXT};
use crate::navigation::{AuthMode, Navigator, Page};
use crate::render;
use common::types::InternshipId;
use hub_client::{
    ApiClient, ApiError, Internship, InternshipPage, LoginForm, LoginResponse, ProfileUpdate,
    RecommendationsResponse, RegistrationForm, SearchParams, ValidationError,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

/// Failure of a screen flow.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AppError {
    /// Text to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::Api(e) => e.user_message(),
        }
    }
}

/// Result of executing one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text to print.
    Output(String),
    /// The user asked to leave.
    Quit,
}

/// The running client: API access plus the current page.
#[derive(Debug)]
pub struct App {
    client: ApiClient,
    navigator: Navigator,
}

impl App {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let navigator = Navigator::new(client.session().subscribe());
        Self { client, navigator }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn navigator(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    /// Current page with the gate applied.
    pub fn current_page(&mut self) -> Page {
        self.navigator.current_page().clone()
    }

    /// Header line for the current page.
    pub fn header(&mut self) -> String {
        let page = self.current_page();
        render::page_header(
            &page,
            &self.client.session().auth_state(),
            self.navigator.auth_mode(),
        )
    }

    /// Validate and submit the login form. The page does not change.
    ///
    /// # Errors
    ///
    /// `AppError::Validation` for empty fields, otherwise any `ApiError`.
    pub async fn submit_login(&mut self, form: &LoginForm) -> Result<LoginResponse, AppError> {
        let request = form.validate()?;
        let response = self.client.login(&request).await?;
        Ok(response)
    }

    /// Validate and submit the registration form, then switch the auth page
    /// to the login form.
    ///
    /// # Errors
    ///
    /// `AppError::Validation` for rejected fields, otherwise any `ApiError`.
    pub async fn submit_register(&mut self, form: &RegistrationForm) -> Result<Value, AppError> {
        let request = form.validate()?;
        let response = self.client.register(&request).await?;
        self.navigator.set_auth_mode(AuthMode::Login);
        Ok(response)
    }

    /// Save the profile, then go to recommendations.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call.
    pub async fn submit_profile(&mut self, update: &ProfileUpdate) -> Result<Value, AppError> {
        let response = self.client.update_profile(&update.normalized()).await?;
        self.navigator.navigate_to(Page::Recommendations);
        Ok(response)
    }

    /// Sign out. A protected page falls back to auth on the next read.
    ///
    /// # Errors
    ///
    /// `ApiError::Storage` if the persisted token cannot be removed.
    pub fn logout(&mut self) -> Result<(), AppError> {
        self.client.logout()?;
        self.navigator.enforce();
        Ok(())
    }

    /// Open recommendations and load them. Returns `None` when the gate
    /// redirected to auth, in which case no call is made.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call.
    pub async fn open_recommendations(
        &mut self,
        max_distance_km: Option<u32>,
    ) -> Result<Option<RecommendationsResponse>, AppError> {
        if self.navigator.navigate_to(Page::Recommendations) != &Page::Recommendations {
            return Ok(None);
        }
        Ok(Some(self.client.get_recommendations(max_distance_km).await?))
    }

    /// Open the listing at `page`.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call.
    pub async fn open_internships(&mut self, page: u32) -> Result<InternshipPage, AppError> {
        self.navigator.navigate_to(Page::Internships);
        Ok(self.client.get_internships(page).await?)
    }

    /// Search from the listing page.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call.
    pub async fn search(&mut self, params: &SearchParams) -> Result<InternshipPage, AppError> {
        self.navigator.navigate_to(Page::Internships);
        Ok(self.client.search_internships(params).await?)
    }

    /// Open the detail page of one listing.
    ///
    /// # Errors
    ///
    /// Any `ApiError` from the call.
    pub async fn open_internship(&mut self, id: &InternshipId) -> Result<Internship, AppError> {
        self.navigator
            .navigate_to(Page::InternshipDetail(id.clone()));
        Ok(self.client.get_internship_by_id(id).await?)
    }

    /// Backend, database and cache status in one object. Each part reports
    /// its own failure without hiding the others.
    pub async fn status(&self) -> Value {
        let (health, db, redis) = tokio::join!(
            self.client.health_check(),
            self.client.db_status(),
            self.client.redis_status()
        );

        let part = |result: Result<Value, ApiError>| match result {
            Ok(value) => value,
            Err(e) => json!({ "error": e.user_message() }),
        };
        json!({
            "health": part(health),
            "database": part(db),
            "redis": part(redis),
        })
    }

    /// Run one command.
    ///
    /// # Errors
    ///
    /// Any `AppError` raised by the flow behind the command.
    pub async fn execute(&mut self, command: Command) -> Result<Outcome, AppError> {
        let output = match command {
            Command::Home => self.show_page(Page::Home),
            Command::Go(page) => self.show_page(page),
            Command::Auth(mode) => {
                self.navigator.navigate_to_auth(mode);
                self.show_current()
            }
            Command::Profile => self.show_page(Page::Profile),
            Command::Login(form) => {
                let response = self.submit_login(&form).await?;
                if response.token.is_some() {
                    let name = self
                        .client
                        .session()
                        .auth_state()
                        .user
                        .map_or_else(|| "there".to_string(), |user| user.display_name().to_string());
                    format!("Welcome, {name}!")
                } else {
                    response
                        .message
                        .unwrap_or_else(|| "Login did not return a session.".to_string())
                }
            }
            Command::Register(form) => {
                self.submit_register(&form).await?;
                "Registration successful. Please log in with your new account.".to_string()
            }
            Command::Logout => {
                self.logout()?;
                format!("Signed out.\n{}", self.header())
            }
            Command::UpdateProfile(update) => {
                self.submit_profile(&update).await?;
                format!("Profile saved.\n{}", self.header())
            }
            Command::Recommend(km) => match self.open_recommendations(km).await? {
                Some(response) => render::recommendations(&response),
                None => format!("Please sign in first.\n{}", self.show_current()),
            },
            Command::Internships(page) => {
                let listing = self.open_internships(page).await?;
                render::internship_page(&listing, "internships")
            }
            Command::Search(params) => {
                let results = self.search(&params).await?;
                let again = format!("search {}", params.q.as_deref().unwrap_or_default());
                render::internship_page(&results, &again)
            }
            Command::Show(id) => render::internship_detail(&self.open_internship(&id).await?),
            Command::ClearCache => render::json(&self.client.clear_cache().await?),
            Command::Health => render::json(&self.client.health_check().await?),
            Command::Status => render::json(&self.status().await),
            Command::Help => HELP_TEXT.to_string(),
            Command::Quit => {
                info!("Quit requested");
                return Ok(Outcome::Quit);
            }
        };
        Ok(Outcome::Output(output))
    }

    fn show_page(&mut self, page: Page) -> String {
        let requested = page.clone();
        if self.navigator.navigate_to(page) != &requested {
            warn!(page = %requested, "Redirected to auth");
        }
        self.show_current()
    }

    fn show_current(&mut self) -> String {
        let page = self.current_page();
        format!(
            "{}\n{}",
            self.header(),
            render::page_body(&page, self.navigator.auth_mode())
        )
    }
}
