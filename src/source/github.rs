//! GitHub releases.

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::sync::Arc;

use super::{Lookup, ReleaseSource, is_archive_name};
use crate::constants::GITHUB_API_BASE;
use crate::http::HttpClient;
use crate::models::{ReleaseCandidate, Stability};

#[derive(Deserialize)]
struct GitHubRelease {
    tag_name: String,
    #[serde(default)]
    prerelease: bool,
    #[serde(default)]
    assets: Vec<GitHubAsset>,
}

#[derive(Deserialize)]
struct GitHubAsset {
    name: String,
    browser_download_url: String,
}

/// Extract `owner/repo` from a GitHub URL (`https://github.com/o/r(.git)`
/// or `git@github.com:o/r.git`).
pub fn github_repo_path(url: &str) -> Option<String> {
    let re = Regex::new(r"github\.com[/:](.+?)(?:\.git)?/?$").ok()?;
    re.captures(url.trim()).and_then(|c| c.get(1)).map(|m| m.as_str().to_string())
}

/// Reads `releases/latest` for a repository URL.
///
/// The Minecraft version is ignored: GitHub releases carry no game version
/// metadata, so the verifier checks the downloaded jar instead.
pub struct GitHubSource {
    http: Arc<HttpClient>,
    api_base: String,
    token: Option<String>,
}

impl GitHubSource {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self::with_api_base(http, GITHUB_API_BASE, None)
    }

    pub fn with_api_base(
        http: Arc<HttpClient>,
        api_base: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Some(token) = &self.token
            && let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}"))
        {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }
}

#[async_trait]
impl ReleaseSource for GitHubSource {
    fn name(&self) -> &'static str {
        "GitHub"
    }

    async fn lookup(&self, repo_url: &str, _minecraft_version: &str) -> Lookup {
        let Some(repo_path) = github_repo_path(repo_url) else {
            return Lookup::NotFound;
        };
        let url = format!("{}/repos/{}/releases/latest", self.api_base, repo_path);

        let release = match self.http.get_json(&url, self.headers()).await {
            Ok(Some(value)) => value,
            Ok(None) => return Lookup::NotFound,
            Err(e) => return e.into(),
        };

        // Error payloads ({"message": ...}) have no tag_name
        let Ok(release) = serde_json::from_value::<GitHubRelease>(release) else {
            return Lookup::NotFound;
        };

        match release.assets.into_iter().find(|a| is_archive_name(&a.name)) {
            Some(asset) => Lookup::Found(ReleaseCandidate::new(
                release.tag_name,
                Stability::from_prerelease(release.prerelease),
                asset.browser_download_url,
                asset.name,
            )),
            None => Lookup::NotFound,
        }
    }
}
