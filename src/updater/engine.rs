//! The per-mod update decision.

use std::sync::Arc;

use crate::config::GlobalConfig;
use crate::core::ModupError;
use crate::http::HttpClient;
use crate::manifest::{ModEntry, ModSource};
use crate::models::{DecisionSource, ReleaseCandidate, UpdateAction, UpdateDecision};
use crate::source::{
    ForkChainResolver, GitHubSource, GitLabSource, ModrinthSource, ReleaseSource,
};

/// Per-mod error text for a source with no adapter. An empty value means the
/// entry has no `source` at all.
pub(crate) fn unsupported_source_message(raw: &str) -> String {
    let source_name = if raw.trim().is_empty() { "(missing)" } else { raw };
    ModupError::UnsupportedSource {
        source_name: source_name.to_string(),
    }
    .to_string()
}

/// Flags that shape a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOptions {
    pub dry_run: bool,
    /// Refresh config fields without downloading.
    pub config_only: bool,
    pub minecraft_version: String,
}

impl DecisionOptions {
    pub fn new(minecraft_version: impl Into<String>) -> Self {
        Self {
            dry_run: false,
            config_only: false,
            minecraft_version: minecraft_version.into(),
        }
    }

    /// Found candidates become `simulate` instead of `download`.
    pub const fn is_simulating(&self) -> bool {
        self.dry_run || self.config_only
    }
}

/// Result of asking a mod's configured source, before any action is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryLookup {
    Resolved(Option<ReleaseCandidate>),
    /// GitHub/GitLab entry without a `fallback_repo` URL.
    MissingRepository,
    Unsupported(String),
}

/// Decides, for one mod, whether there is something to download.
///
/// States are visited in a fixed order: fork chain, primary source, archived
/// marker, action selection. Lookups inside one evaluation are sequential so
/// the first fork that answers wins. Upstream failures never escape: they
/// become "nothing found" and the decision is `skip`.
pub struct UpdateEngine {
    modrinth: Arc<dyn ReleaseSource>,
    github: Arc<dyn ReleaseSource>,
    gitlab: Arc<dyn ReleaseSource>,
    forks: ForkChainResolver,
}

impl UpdateEngine {
    /// Wire an engine from explicit sources. Forks reuse the GitHub source.
    pub fn new(
        modrinth: Arc<dyn ReleaseSource>,
        github: Arc<dyn ReleaseSource>,
        gitlab: Arc<dyn ReleaseSource>,
    ) -> Self {
        let forks = ForkChainResolver::new(github.clone());
        Self {
            modrinth,
            github,
            gitlab,
            forks,
        }
    }

    /// Production wiring against the endpoints in `config`.
    pub fn from_config(config: &GlobalConfig, http: Arc<HttpClient>) -> Self {
        let modrinth =
            ModrinthSource::with_api_base(http.clone(), &config.modrinth_api, &config.loader);
        let github =
            GitHubSource::with_api_base(http.clone(), &config.github_api, config.github_token.clone());
        let gitlab = GitLabSource::with_api_base(http, &config.gitlab_api);
        Self::new(Arc::new(modrinth), Arc::new(github), Arc::new(gitlab))
    }

    /// Query the entry's own source, ignoring forks.
    pub async fn lookup_primary(&self, entry: &ModEntry, minecraft_version: &str) -> PrimaryLookup {
        let (source, project) = match &entry.source {
            ModSource::Modrinth => (&self.modrinth, entry.id.as_str()),
            ModSource::GitHub | ModSource::GitLab => {
                let Some(repo) = entry.fallback_repo.as_deref().filter(|r| !r.trim().is_empty())
                else {
                    return PrimaryLookup::MissingRepository;
                };
                let source =
                    if entry.source == ModSource::GitHub { &self.github } else { &self.gitlab };
                (source, repo)
            }
            ModSource::Unsupported(raw) => return PrimaryLookup::Unsupported(raw.clone()),
        };

        PrimaryLookup::Resolved(source.resolve(project, minecraft_version).await)
    }

    /// Evaluate one mod. Never fails; per-mod problems land in
    /// [`UpdateDecision::error`].
    pub async fn decide(&self, entry: &ModEntry, options: &DecisionOptions) -> UpdateDecision {
        let simulating = options.is_simulating();

        if !entry.forks.is_empty()
            && let Some(found) = self.forks.resolve(&entry.forks, &options.minecraft_version).await
        {
            return UpdateDecision {
                action: if simulating { UpdateAction::Simulate } else { UpdateAction::Download },
                source: DecisionSource::Fork,
                candidate: Some(found.candidate),
                fork_url: Some(found.fork_url),
                error: None,
            };
        }

        let source = DecisionSource::Primary(entry.source.clone());
        let candidate = match self.lookup_primary(entry, &options.minecraft_version).await {
            PrimaryLookup::Resolved(candidate) => candidate,
            PrimaryLookup::MissingRepository => {
                tracing::debug!("{} has no repository URL", entry.id);
                None
            }
            PrimaryLookup::Unsupported(raw) => {
                return UpdateDecision {
                    error: Some(unsupported_source_message(&raw)),
                    ..UpdateDecision::skip(source)
                };
            }
        };

        let action = match &candidate {
            None => UpdateAction::Skip,
            // Hook for upstreams that flag a release as already archived
            Some(c) if c.archived => UpdateAction::Skip,
            Some(_) if simulating => UpdateAction::Simulate,
            Some(_) => UpdateAction::Download,
        };

        UpdateDecision {
            action,
            source,
            candidate,
            fork_url: None,
            error: None,
        }
    }
}
