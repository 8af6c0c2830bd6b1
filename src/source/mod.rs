//! Upstream release lookup.
//!
//! Every upstream is reached through the [`ReleaseSource`] trait, which turns a
//! project reference (a Modrinth project id or a repository URL) into a
//! normalized [`ReleaseCandidate`]. The decision engine never sees which
//! upstream it is talking to.
//!
//! # Components
//!
//! - [`ModrinthSource`] - versions endpoint filtered by loader and game version
//! - [`GitHubSource`] - latest release of a repository
//! - [`GitLabSource`] - latest release, falling back to tags with assets
//! - [`ForkChainResolver`] - ordered GitHub fork list, first match wins
//!
//! # Failure model
//!
//! Sources report a [`Lookup`] so diagnostics survive, but the engine only
//! consumes the folded [`ReleaseSource::resolve`] result: a transport failure
//! and "no compatible release" both become `None`. One unreachable upstream
//! therefore never aborts a batch.

use async_trait::async_trait;
use reqwest::Url;
use std::path::Path;
use tracing::{debug, warn};

use crate::constants::ARCHIVE_SUFFIX;
use crate::models::ReleaseCandidate;

mod fork;
mod github;
mod gitlab;
mod modrinth;


pub use fork::{ForkChainResolver, ForkMatch};
pub use github::{GitHubSource, github_repo_path};
pub use gitlab::{GitLabSource, gitlab_project_path};
pub use modrinth::ModrinthSource;

/// Outcome of asking one upstream about one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(ReleaseCandidate),
    /// The upstream answered but has nothing usable (no release, no `.jar`).
    NotFound,
    /// The upstream could not be asked or answered with something unexpected.
    TransportError(String),
}

impl From<anyhow::Error> for Lookup {
    fn from(error: anyhow::Error) -> Self {
        Self::TransportError(format!("{error:#}"))
    }
}

/// A release feed that can be asked for the newest compatible artifact.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Look up the newest release of `project` targeting `minecraft_version`.
    ///
    /// Implementations must never panic or return a candidate whose file name
    /// lacks the `.jar` suffix.
    async fn lookup(&self, project: &str, minecraft_version: &str) -> Lookup;

    /// [`ReleaseSource::lookup`] folded to the engine's contract.
    async fn resolve(&self, project: &str, minecraft_version: &str) -> Option<ReleaseCandidate> {
        match self.lookup(project, minecraft_version).await {
            Lookup::Found(candidate) => {
                debug!("[{}] {} -> {}", self.name(), project, candidate.version);
                Some(candidate)
            }
            Lookup::NotFound => {
                debug!("[{}] no compatible release for {}", self.name(), project);
                None
            }
            Lookup::TransportError(detail) => {
                warn!("[{}] lookup failed for {}: {}", self.name(), project, detail);
                None
            }
        }
    }
}

/// A bare `*.jar` file name: no directory components, no `..`.
///
/// Upstream asset names are free-form, so anything that would resolve outside
/// the mods directory is not an archive name.
pub fn is_archive_name(name: &str) -> bool {
    name.ends_with(ARCHIVE_SUFFIX)
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some_and(|n| n == name)
}

/// File name for an asset that has both a display name and a download URL.
///
/// The name wins when it is a bare `.jar` name; otherwise the last path
/// segment of the URL is used if it is one.
pub(crate) fn archive_file_name(name: Option<&str>, url: &str) -> Option<String> {
    if let Some(name) = name.filter(|n| is_archive_name(n)) {
        return Some(name.to_string());
    }
    let url = Url::parse(url).ok()?;
    let segment = url.path_segments()?.next_back()?;
    is_archive_name(segment).then(|| segment.to_string())
}
