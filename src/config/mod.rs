//! Configuration for modup
//!
//! Two layers of configuration exist:
//!
//! 1. **Global config** ([`GlobalConfig`], `~/.modup/config.toml`): user-wide
//!    defaults such as the target game version, where the mods folder lives,
//!    API endpoints and an optional GitHub token.
//! 2. **Mods config** ([`crate::manifest::ModsManifest`], `mods_config.json`):
//!    the list of tracked mods and their last verified versions.
//!
//! Command-line flags override both.

mod global;

pub use global::GlobalConfig;
