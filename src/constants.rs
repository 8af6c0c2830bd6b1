//! Global constants used throughout the modup codebase.
//!
//! This module contains the default target platform, upstream API endpoints,
//! file-format markers and numeric limits that are shared across modules.
//! Defining them centrally keeps magic strings discoverable.

/// Game version targeted when neither the CLI nor the global config overrides it.
pub const DEFAULT_MINECRAFT_VERSION: &str = "1.21.8";

/// Mod loader used to filter Modrinth versions.
pub const DEFAULT_LOADER: &str = "fabric";

/// File suffix every downloadable mod artifact must carry.
pub const ARCHIVE_SUFFIX: &str = ".jar";

/// Name of the cold-storage directory inside the mods directory.
pub const OLD_DIR_NAME: &str = ".old";

/// Directory segment that marks the active mods folder in a path.
pub const MODS_DIR_NAME: &str = "mods";

/// Default location of the persisted mods configuration.
pub const DEFAULT_MODS_CONFIG: &str = "mods_config.json";

/// Jar entry holding the embedded manifest.
pub const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

/// Jar entry holding Fabric mod metadata (fallback version source).
pub const FABRIC_MOD_JSON_ENTRY: &str = "fabric.mod.json";

/// Manifest key carrying the targeted game version.
pub const MINECRAFT_VERSION_KEY: &str = "Fabric-Minecraft-Version:";

/// Maximum number of HTTP redirects followed by a download.
pub const MAX_REDIRECTS: usize = 5;

/// Number of mods evaluated concurrently.
///
/// Upstream APIs are rate limited; keeping the fan-out small avoids
/// 429 responses on large configurations.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Name similarity at or above which picky mode treats a file as superseded.
pub const SIMILARITY_THRESHOLD: f64 = 0.6;

/// User agent sent with every API request. GitHub rejects requests without one.
pub const DEFAULT_USER_AGENT: &str = concat!("modup/", env!("CARGO_PKG_VERSION"));

/// Base URL of the Modrinth v2 API.
pub const MODRINTH_API_BASE: &str = "https://api.modrinth.com/v2";

/// Base URL of the GitHub REST API.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Base URL of the GitLab v4 API.
pub const GITLAB_API_BASE: &str = "https://gitlab.com/api/v4";
