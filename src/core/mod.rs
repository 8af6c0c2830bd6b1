//! Core types for modup
//!
//! This module holds the error taxonomy shared by every other module:
//! - [`ModupError`] - strongly-typed errors for the conditions that abort work
//! - [`ErrorContext`] - user-facing wrapper with details and a suggestion
//! - [`user_friendly_error`] - converts any `anyhow::Error` for display in the CLI
//!
//! Per-mod lookup failures are not represented here; see
//! [`crate::source::Lookup`] for how resolvers report "nothing found" versus
//! transport problems.

pub mod error;

pub use error::{ErrorContext, ModupError, user_friendly_error};
