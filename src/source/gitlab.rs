//! GitLab releases, with a tags fallback.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::{Lookup, ReleaseSource, archive_file_name};
use crate::constants::GITLAB_API_BASE;
use crate::http::HttpClient;
use crate::models::{ReleaseCandidate, Stability};

#[derive(Deserialize)]
struct GitLabRelease {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    assets: Option<GitLabAssets>,
}

#[derive(Deserialize)]
struct GitLabTag {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    release: Option<GitLabRelease>,
    #[serde(default)]
    assets: Option<GitLabAssets>,
}

#[derive(Deserialize)]
struct GitLabAssets {
    #[serde(default)]
    links: Vec<GitLabLink>,
}

#[derive(Deserialize)]
struct GitLabLink {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl GitLabAssets {
    /// First link with a usable jar file name, as `(file_name, url)`.
    ///
    /// Link names are free-form labels, so a name like `Download` falls back
    /// to the URL's last path segment.
    fn first_archive(&self) -> Option<(String, String)> {
        self.links.iter().find_map(|link| {
            let url = link.url.as_deref()?;
            let file_name = archive_file_name(link.name.as_deref(), url)?;
            Some((file_name, url.to_string()))
        })
    }
}

/// Extract the `namespace/project` path from a gitlab.com URL.
pub fn gitlab_project_path(url: &str) -> Option<String> {
    let re = Regex::new(r"gitlab\.com[/:](.+?)(?:\.git)?/?$").ok()?;
    re.captures(url.trim()).and_then(|c| c.get(1)).map(|m| m.as_str().to_string())
}

/// Reads the project's releases, then its tags, looking for a `.jar` link.
///
/// GitLab has no prerelease flag at this level, so every hit is reported as
/// a release.
pub struct GitLabSource {
    http: Arc<HttpClient>,
    api_base: String,
}

impl GitLabSource {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self::with_api_base(http, GITLAB_API_BASE)
    }

    pub fn with_api_base(http: Arc<HttpClient>, api_base: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/projects/{url-encoded path}/{tail...}`
    fn project_url(&self, project_path: &str, tail: &[&str]) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.api_base)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| anyhow::anyhow!("GitLab API base cannot be a base URL"))?;
            segments.pop_if_empty().push("projects").push(project_path).extend(tail);
        }
        Ok(url)
    }

    async fn from_releases(&self, project_path: &str) -> anyhow::Result<Option<ReleaseCandidate>> {
        let url = self.project_url(project_path, &["releases"])?;
        let Some(value) = self.http.get_json(url.as_str(), HeaderMap::new()).await? else {
            return Ok(None);
        };
        let releases: Vec<GitLabRelease> = serde_json::from_value(value).unwrap_or_default();

        let Some(release) = releases.into_iter().next() else {
            return Ok(None);
        };
        let asset = release.assets.as_ref().and_then(GitLabAssets::first_archive);

        Ok(match (release.tag_name, asset) {
            (Some(tag), Some((name, url))) => {
                Some(ReleaseCandidate::new(tag, Stability::Release, url, name))
            }
            _ => None,
        })
    }

    async fn from_tags(&self, project_path: &str) -> anyhow::Result<Option<ReleaseCandidate>> {
        let url = self.project_url(project_path, &["repository", "tags"])?;
        let Some(value) = self.http.get_json(url.as_str(), HeaderMap::new()).await? else {
            return Ok(None);
        };
        let tags: Vec<GitLabTag> = serde_json::from_value(value).unwrap_or_default();

        // Tags are scanned in the order returned; first usable one wins
        for tag in tags {
            let assets = tag
                .release
                .as_ref()
                .and_then(|r| r.assets.as_ref())
                .or(tag.assets.as_ref());
            let Some((name, url)) = assets.and_then(GitLabAssets::first_archive) else {
                continue;
            };
            match tag.name {
                Some(tag_name) if !tag_name.is_empty() => {
                    return Ok(Some(ReleaseCandidate::new(tag_name, Stability::Release, url, name)));
                }
                _ => continue,
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl ReleaseSource for GitLabSource {
    fn name(&self) -> &'static str {
        "GitLab"
    }

    async fn lookup(&self, repo_url: &str, _minecraft_version: &str) -> Lookup {
        let Some(project_path) = gitlab_project_path(repo_url) else {
            return Lookup::NotFound;
        };

        // Any releases failure still leaves the tags endpoint to try
        match self.from_releases(&project_path).await {
            Ok(Some(candidate)) => return Lookup::Found(candidate),
            Ok(None) => {}
            Err(e) => debug!("GitLab releases lookup for {} failed: {:#}", project_path, e),
        }

        match self.from_tags(&project_path).await {
            Ok(Some(candidate)) => Lookup::Found(candidate),
            Ok(None) => Lookup::NotFound,
            Err(e) => e.into(),
        }
    }
}
