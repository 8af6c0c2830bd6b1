//! modup - keep a Minecraft mods folder up to date
//!
//! modup reads a JSON list of mods (`mods_config.json`), asks each mod's
//! upstream (Modrinth, GitHub releases or GitLab releases) for the newest
//! release that targets the configured game version, downloads it into the
//! mods folder, and verifies the game version embedded in the jar before
//! recording it as the mod's latest known-good version.
//!
//! # Architecture Overview
//!
//! - `mods_config.json` lists the desired mods and records the last verified
//!   version of each one
//! - `~/.modup/config.toml` holds the game version, loader, API endpoints and
//!   batch size
//! - `mods/` is the active mods folder; anything superseded is moved to
//!   `mods/.old` instead of being deleted
//!
//! ## Key Features
//!
//! - **Fork priority**: GitHub forks listed on a mod are consulted before its
//!   own source; the first fork with a compatible release wins
//! - **Verified commits**: a version is only written to the config after the
//!   downloaded jar proves it targets the expected game version
//! - **Never re-download**: versions already archived in `.old` are skipped
//! - **Dry run**: show what would be downloaded and archived without touching
//!   disk or config
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface (`update`, `list`, `add fork`, `sort`)
//! - [`config`] - Global configuration (`~/.modup/config.toml`)
//! - [`core`] - Error types and user-facing error formatting
//! - [`manifest`] - The persisted mods config
//! - [`models`] - Release candidates and update decisions
//!
//! ## Update Pipeline
//!
//! - [`source`] - Modrinth, GitHub and GitLab release lookups plus fork chains
//! - [`updater`] - Decision engine, batch runner and version report
//! - [`verify`] - Game version extraction from jar metadata
//! - [`archive`] - The `.old` archive: clearing, similarity matching, sorting
//!
//! ## Supporting Modules
//!
//! - [`http`] - Shared HTTP client for JSON APIs and file downloads
//! - [`utils`] - Filesystem helpers and progress indicators
//! - [`constants`] - Well-known paths, jar entries and defaults
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Download everything that has a newer compatible release
//! modup update
//!
//! # Preview without touching anything
//! modup update --dry-run
//!
//! # Check versions without downloading
//! modup list --format json
//!
//! # Prefer a fork of carpet
//! modup add fork https://github.com/someone/fabric-carpet carpet
//!
//! # Group archived jars by game version
//! modup sort
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod http;
pub mod manifest;
pub mod models;
pub mod source;
pub mod updater;
pub mod utils;
pub mod verify;

// Available to unit tests and, via the `test-utils` feature, integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
