//! Error handling for modup
//!
//! This module provides the error taxonomy and user-friendly error reporting for
//! the mod updater. The error system is designed around two core principles:
//! 1. **Strongly-typed errors** for the few conditions that may halt a run
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! Most per-mod failures are *not* errors at all: a resolver that cannot reach
//! its upstream, or an upstream without a compatible release, degrades to a
//! "nothing found" outcome and the batch carries on. The variants below are
//! reserved for conditions that abort either one mod's evaluation or the whole
//! run:
//!
//! - **Configuration**: [`ModupError::ConfigNotFound`], [`ModupError::ManifestParseError`]
//! - **Lookup**: [`ModupError::ModNotFound`], [`ModupError::UnsupportedSource`]
//! - **Integration**: [`ModupError::NoModsDirectory`], [`ModupError::UnsafeFileName`]
//! - **Transport**: [`ModupError::DownloadFailed`], [`ModupError::TooManyRedirects`]
//! - **File System**: [`ModupError::ArchiveError`], [`ModupError::IoError`]
//!
//! Use [`user_friendly_error`] to convert any error into a user-friendly format
//! with contextual suggestions.
//!
//! # Examples
//!
//! ```rust,no_run
//! use modup_cli::core::{ModupError, ErrorContext};
//!
//! let context = ErrorContext::new(ModupError::ModNotFound {
//!     query: "sodium".to_string(),
//! })
//! .with_suggestion("Run 'modup list' to see configured mods");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for modup operations
///
/// # Error Categories
///
/// ## Configuration
/// - [`ConfigNotFound`] - The mods configuration file does not exist
/// - [`ManifestParseError`] - The mods configuration is not valid JSON of the expected shape
/// - [`GlobalConfigError`] - The global TOML configuration is invalid
///
/// ## Per-mod evaluation
/// - [`ModNotFound`] - No configured mod matches the requested id, name or slug
/// - [`UnsupportedSource`] - A mod entry names a source with no adapter
///
/// ## Verification
/// - [`NoModsDirectory`] - The mods directory has no `mods` segment; halts a run before any download
/// - [`UnsafeFileName`] - An upstream file name that is not a bare `.jar` name
///
/// [`ConfigNotFound`]: ModupError::ConfigNotFound
/// [`ManifestParseError`]: ModupError::ManifestParseError
/// [`GlobalConfigError`]: ModupError::GlobalConfigError
/// [`ModNotFound`]: ModupError::ModNotFound
/// [`UnsupportedSource`]: ModupError::UnsupportedSource
/// [`NoModsDirectory`]: ModupError::NoModsDirectory
/// [`UnsafeFileName`]: ModupError::UnsafeFileName
#[derive(Error, Debug)]
pub enum ModupError {
    #[error("Config file not found: {path}")]
    ConfigNotFound {
        /// Path to the configuration file that was not found
        path: String,
    },

    #[error("Invalid mods config in {file}")]
    ManifestParseError {
        /// Path to the mods configuration that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    #[error("Invalid global config in {file}: {reason}")]
    GlobalConfigError {
        /// Path to the global configuration file
        file: String,
        /// Specific reason for the failure
        reason: String,
    },

    #[error("Mod '{query}' not found in config")]
    ModNotFound {
        /// The id, name or slug that was searched for
        query: String,
    },

    #[error("Unsupported source: {source_name}")]
    UnsupportedSource {
        /// The raw source value from the configuration
        source_name: String,
    },

    #[error("mods directory not found in path: {path}")]
    NoModsDirectory {
        /// The path that was expected to live under a `mods` directory
        path: String,
    },

    #[error("Refusing to write '{name}': not a plain .jar file name")]
    UnsafeFileName {
        /// The file name reported by the upstream
        name: String,
    },

    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed {
        /// The URL that failed to download
        url: String,
        /// Reason for the failure (HTTP status, missing location header, ...)
        reason: String,
    },

    #[error("Too many redirects for {url}")]
    TooManyRedirects {
        /// The URL whose redirect chain exceeded the bound
        url: String,
    },

    #[error("Failed to archive '{path}': {reason}")]
    ArchiveError {
        /// The file that could not be moved into cold storage
        path: String,
        /// Reason for the failure
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{message}")]
    Other {
        /// Free-form message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context about the error in yellow (optional)
/// 3. **Suggestion**: Actionable steps to resolve the issue in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    pub error: ModupError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: ModupError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colours.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognises [`ModupError`] variants anywhere in the error chain, plain
/// [`std::io::Error`]s and JSON/TOML parse failures. Anything else is rendered
/// with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<ErrorContext>() {
        Ok(ctx) => return ctx,
        Err(error) => error,
    };

    let error = match error.downcast::<ModupError>() {
        Ok(modup_error) => return create_error_context(modup_error),
        Err(error) => error,
    };

    // A ModupError wrapped in .context() still deserves its suggestion
    if let Some(modup_error) = error.chain().find_map(|e| e.downcast_ref::<ModupError>()) {
        let suggestion = suggestion_for(modup_error);
        let mut ctx = ErrorContext::new(ModupError::Other {
            message: render_chain(&error),
        });
        if let Some(suggestion) = suggestion {
            ctx = ctx.with_suggestion(suggestion);
        }
        return ctx;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(ModupError::Other {
                    message: render_chain(&error),
                })
                .with_suggestion(if cfg!(windows) {
                    "Check file permissions in File Explorer or run as Administrator"
                } else {
                    "Check file permissions with 'ls -la'"
                })
                .with_details("modup needs write access to the mods directory and its .old archive");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(ModupError::Other {
                    message: render_chain(&error),
                })
                .with_suggestion("Check that the file or directory exists and the path is spelled correctly");
            }
            _ => {}
        }
    }

    if error.downcast_ref::<serde_json::Error>().is_some() {
        return ErrorContext::new(ModupError::Other {
            message: render_chain(&error),
        })
        .with_suggestion("Check the JSON syntax of your mods config. It must be an object with a 'mods' array");
    }

    ErrorContext::new(ModupError::Other {
        message: render_chain(&error),
    })
}

fn render_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();

    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

fn suggestion_for(error: &ModupError) -> Option<String> {
    match error {
        ModupError::ConfigNotFound {
            ..
        } => Some(
            "Create a mods_config.json with a top-level 'mods' array, or pass --mods-config <path>"
                .to_string(),
        ),
        ModupError::ManifestParseError {
            file,
            ..
        } => Some(format!(
            "Check the JSON syntax in {file}. The document must look like {{ \"mods\": [ ... ] }}"
        )),
        ModupError::GlobalConfigError {
            file,
            ..
        } => Some(format!("Fix or remove {file}; every key is optional")),
        ModupError::ModNotFound {
            ..
        } => Some("Use the mod's id, slug or display name as it appears in the config".to_string()),
        ModupError::UnsupportedSource {
            ..
        } => Some("Set 'source' to one of MODRINTH (MR), GITHUB (GH) or GITLAB (GL)".to_string()),
        ModupError::NoModsDirectory {
            ..
        } => Some("Point --mods-dir (or mods_dir in the global config) at a folder named 'mods'".to_string()),
        ModupError::TooManyRedirects {
            ..
        }
        | ModupError::DownloadFailed {
            ..
        } => Some("Check your internet connection and that the release asset still exists".to_string()),
        _ => None,
    }
}

fn create_error_context(error: ModupError) -> ErrorContext {
    let suggestion = suggestion_for(&error);
    let details = match &error {
        ModupError::ManifestParseError {
            reason,
            ..
        } => Some(reason.clone()),
        ModupError::NoModsDirectory {
            ..
        } => Some(
            "Downloaded files must live under a directory named 'mods' so mismatches can be archived into mods/.old"
                .to_string(),
        ),
        _ => None,
    };

    let mut ctx = ErrorContext::new(error);
    if let Some(suggestion) = suggestion {
        ctx = ctx.with_suggestion(suggestion);
    }
    if let Some(details) = details {
        ctx = ctx.with_details(details);
    }
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_display() {
        let error = ModupError::UnsupportedSource {
            source_name: "INVALID".to_string(),
        };
        assert_eq!(error.to_string(), "Unsupported source: INVALID");

        let error = ModupError::ModNotFound {
            query: "sodium".to_string(),
        };
        assert_eq!(error.to_string(), "Mod 'sodium' not found in config");

        let error = ModupError::TooManyRedirects {
            url: "https://cdn.example/mod.jar".to_string(),
        };
        assert_eq!(error.to_string(), "Too many redirects for https://cdn.example/mod.jar");
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(ModupError::ConfigNotFound {
            path: "mods_config.json".to_string(),
        })
        .with_suggestion("Create it");

        let display = format!("{ctx}");
        assert!(display.contains("Config file not found: mods_config.json"));
        assert!(display.contains("Suggestion: Create it"));
    }

    #[test]
    fn test_user_friendly_error_direct_variant() {
        let err = anyhow::Error::from(ModupError::ModNotFound {
            query: "x".to_string(),
        });
        let ctx = user_friendly_error(err);
        assert!(matches!(ctx.error, ModupError::ModNotFound { .. }));
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_error_wrapped_variant_keeps_suggestion() {
        let err: anyhow::Result<()> = Err(ModupError::ConfigNotFound {
            path: "a.json".to_string(),
        }
        .into());
        let err = err.context("Failed to load mods config").unwrap_err();

        let ctx = user_friendly_error(err);
        let message = ctx.error.to_string();
        assert!(message.contains("Failed to load mods config"));
        assert!(message.contains("Config file not found: a.json"));
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_error_generic_chain() {
        let err = anyhow::anyhow!("root cause").context("outer");
        let ctx = user_friendly_error(err);
        let message = ctx.error.to_string();
        assert!(message.starts_with("outer"));
        assert!(message.contains("1: root cause"));
    }
}
