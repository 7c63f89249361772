//! Common utilities and types shared across Internship Hub components.

#![warn(clippy::pedantic)]

/// Module for common data types
pub mod types;

/// Module for client configuration
pub mod config;

/// Module for secret types that prevent accidental logging
pub mod secret;
