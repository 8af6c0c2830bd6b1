//! Integration test suite for modup
//!
//! End-to-end tests that run the `modup` binary against a temp directory and
//! a mock HTTP server standing in for Modrinth, GitHub and GitLab.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: Argument parsing, help and version output
//! - **update**: Download, verification, archival and config commits
//! - **list**: Version report in table, JSON and CSV form
//! - **add_fork**: Registering forks in the mods config
//! - **sort**: Grouping archived jars by game version

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod add_fork;
mod cli;
mod list;
mod sort;
mod update;
