//! Parsing of shell input lines into commands.

use crate::navigation::{AuthMode, Page};
use common::secret::SecretString;
use common::types::InternshipId;
use hub_client::{LoginForm, ProfileUpdate, RegistrationForm, SearchParams};
use thiserror::Error;

/// A parsed shell command.
#[derive(Debug, Clone)]
pub enum Command {
    Home,
    Go(Page),
    /// Open the auth page in the given mode.
    Auth(AuthMode),
    Login(LoginForm),
    Register(RegistrationForm),
    Logout,
    /// Show the profile page.
    Profile,
    UpdateProfile(ProfileUpdate),
    Recommend(Option<u32>),
    Internships(u32),
    Search(SearchParams),
    Show(InternshipId),
    ClearCache,
    Health,
    Status,
    Help,
    Quit,
}

/// Shell input errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: {0} (type `help` for a list)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Not a positive number: {0}")]
    InvalidNumber(String),

    #[error("Unknown page: {0}")]
    UnknownPage(String),

    #[error("Unknown profile field: {0}")]
    UnknownField(String),
}

const LOGIN_USAGE: &str = "login [<email-or-username> <password>]";
const REGISTER_USAGE: &str = "register [<username> <email> <password> <confirm>]";
const GO_USAGE: &str = "go <home|auth|profile|recommendations|internships|internship/<id>>";
const SHOW_USAGE: &str = "show <id>";
const SEARCH_USAGE: &str = "search <query> [page]";

/// Profile fields accepted by `profile key=value ...`.
const PROFILE_FIELDS: [&str; 4] = ["skills", "sectors", "education", "location"];

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` for unknown commands and malformed arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "home" => Command::Home,
            "go" => match args.as_slice() {
                [page] => Command::Go(
                    Page::parse(page).ok_or_else(|| CommandError::UnknownPage((*page).to_string()))?,
                ),
                _ => return Err(CommandError::Usage(GO_USAGE)),
            },
            "login" => match args.as_slice() {
                [] => Command::Auth(AuthMode::Login),
                [identifier, password] => Command::Login(LoginForm {
                    identifier: (*identifier).to_string(),
                    password: SecretString::from(*password),
                }),
                _ => return Err(CommandError::Usage(LOGIN_USAGE)),
            },
            "register" => match args.as_slice() {
                [] => Command::Auth(AuthMode::Register),
                [username, email, password, confirm] => Command::Register(RegistrationForm {
                    username: (*username).to_string(),
                    email: (*email).to_string(),
                    password: SecretString::from(*password),
                    confirm_password: SecretString::from(*confirm),
                }),
                _ => return Err(CommandError::Usage(REGISTER_USAGE)),
            },
            "logout" => Command::Logout,
            "profile" => {
                if args.is_empty() {
                    Command::Profile
                } else {
                    Command::UpdateProfile(parse_profile(&args)?)
                }
            }
            "recommend" | "recommendations" => {
                Command::Recommend(args.first().map(|km| parse_number(km)).transpose()?)
            }
            "internships" => Command::Internships(
                args.first()
                    .map(|page| parse_number(page))
                    .transpose()?
                    .unwrap_or(1),
            ),
            "search" => Command::Search(parse_search(&args)?),
            "show" => match args.as_slice() {
                [id] => Command::Show(InternshipId::new(*id)),
                _ => return Err(CommandError::Usage(SHOW_USAGE)),
            },
            "clear-cache" => Command::ClearCache,
            "health" => Command::Health,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn parse_number(value: &str) -> Result<u32, CommandError> {
    value
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| CommandError::InvalidNumber(value.to_string()))
}

/// `search <words...> [page]`: a trailing positive number is the page when
/// at least one query word precedes it. Any other trailing word stays in the
/// query.
fn parse_search(args: &[&str]) -> Result<SearchParams, CommandError> {
    let Some((last, rest)) = args.split_last() else {
        return Err(CommandError::Usage(SEARCH_USAGE));
    };

    let page = if rest.is_empty() {
        None
    } else {
        parse_number(last).ok()
    };
    Ok(match page {
        Some(page) => SearchParams::query(rest.join(" ")).with_page(page),
        None => SearchParams::query(args.join(" ")),
    })
}

/// `profile skills=Rust,SQL sectors=Technology education=Graduate location=New Delhi`
///
/// Words without a known `key=` prefix continue the previous value, so
/// multi-word values need no quoting. Lists are comma separated.
fn parse_profile(args: &[&str]) -> Result<ProfileUpdate, CommandError> {
    let mut fields: Vec<(&str, String)> = Vec::new();

    for word in args {
        match word.split_once('=') {
            Some((key, value)) if PROFILE_FIELDS.contains(&key) => {
                fields.push((key, value.to_string()));
            }
            _ => match fields.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(word);
                }
                None => {
                    let key = word.split_once('=').map_or(*word, |(key, _)| key);
                    return Err(CommandError::UnknownField(key.to_string()));
                }
            },
        }
    }

    let mut update = ProfileUpdate::default();
    for (key, value) in fields {
        match key {
            "skills" => value.split(',').for_each(|skill| {
                update.add_skill(skill);
            }),
            "sectors" => value.split(',').for_each(|sector| {
                update.add_sector(sector);
            }),
            "education" => update.education = value.trim().to_string(),
            _ => update.location = value.trim().to_string(),
        }
    }
    Ok(update)
}

/// Text printed by `help`.
pub const HELP_TEXT: &str = "\
Commands:
  home                              go to the home page
  go <page>                         open a page (home, auth, profile, recommendations,
                                    internships, internship/<id>)
  login [<email> <password>]        open the login form, or sign in
  register [<user> <email> <pw> <confirm>]
                                    open the registration form, or create an account
  logout                            sign out
  profile [skills=a,b sectors=c education=... location=...]
                                    show or update your profile
  recommend [km]                    personalised recommendations within km (default 150)
  internships [page]                browse all internships
  search <query> [page]             search internships
  show <id>                         internship details
  clear-cache                       clear the recommendation cache
  health                            backend health
  status                            backend, database and cache status
  help                              this text
  quit                              exit";
