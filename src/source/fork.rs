use std::sync::Arc;
use tracing::debug;

use super::{ReleaseSource, github_repo_path};
use crate::models::ReleaseCandidate;

/// A candidate produced by one entry of a mod's fork list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkMatch {
    pub candidate: ReleaseCandidate,
    pub fork_url: String,
}

/// Walks a fork list in order and returns the first usable release.
///
/// List order is priority: the first fork with a `.jar` asset wins even if a
/// later fork has a newer release. URLs that are not GitHub repositories are
/// skipped without a request.
#[derive(Clone)]
pub struct ForkChainResolver {
    github: Arc<dyn ReleaseSource>,
}

impl ForkChainResolver {
    pub fn new(github: Arc<dyn ReleaseSource>) -> Self {
        Self {
            github,
        }
    }

    pub async fn resolve(&self, forks: &[String], minecraft_version: &str) -> Option<ForkMatch> {
        for fork_url in forks {
            if github_repo_path(fork_url).is_none() {
                debug!("Skipping unrecognised fork URL: {}", fork_url);
                continue;
            }

            if let Some(candidate) = self.github.resolve(fork_url, minecraft_version).await {
                return Some(ForkMatch {
                    candidate,
                    fork_url: fork_url.clone(),
                });
            }
        }
        None
    }
}
