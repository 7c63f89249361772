//! Internship Hub terminal client.
//!
//! The [`navigation`] module holds the page state machine and its auth gate;
//! [`app`] wires it to the API client; [`commands`] and [`render`] are the
//! text front end used by the `hub-shell` binary, which sets up tracing
//! through [`logging`].

#![warn(clippy::pedantic)]

pub mod app;
pub mod commands;
pub mod logging;
pub mod navigation;
pub mod render;

pub use app::{App, AppError, Outcome};
pub use commands::{Command, CommandError};
pub use navigation::{AuthMode, Navigator, Page};
