//! Modrinth v2 API.

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::{Lookup, ReleaseSource, is_archive_name};
use crate::constants::{DEFAULT_LOADER, MODRINTH_API_BASE};
use crate::http::HttpClient;
use crate::models::{Provenance, ReleaseCandidate, Stability};

#[derive(Deserialize)]
struct ModrinthVersion {
    version_number: String,
    #[serde(default)]
    version_type: String,
    #[serde(default)]
    files: Vec<ModrinthFile>,
}

#[derive(Deserialize)]
struct ModrinthFile {
    url: String,
    filename: String,
}

#[derive(Deserialize, Default)]
struct ModrinthProject {
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    source_url: Option<String>,
    #[serde(default)]
    repository: Option<String>,
}

/// Looks up the first version Modrinth lists for a loader and game version.
pub struct ModrinthSource {
    http: Arc<HttpClient>,
    api_base: String,
    loader: String,
}

impl ModrinthSource {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self::with_api_base(http, MODRINTH_API_BASE, DEFAULT_LOADER)
    }

    pub fn with_api_base(
        http: Arc<HttpClient>,
        api_base: impl Into<String>,
        loader: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            loader: loader.into(),
        }
    }

    fn versions_url(&self, project_id: &str, minecraft_version: &str) -> anyhow::Result<Url> {
        let url = format!("{}/project/{}/version", self.api_base, project_id);
        Ok(Url::parse_with_params(
            &url,
            &[
                ("loaders", format!("[\"{}\"]", self.loader)),
                ("game_versions", format!("[\"{minecraft_version}\"]")),
            ],
        )?)
    }

    /// Display metadata; any failure yields empty strings.
    async fn provenance(&self, project_id: &str) -> Provenance {
        let url = format!("{}/project/{}", self.api_base, project_id);
        let project = match self.http.get_json(&url, HeaderMap::new()).await {
            Ok(Some(value)) => serde_json::from_value::<ModrinthProject>(value).unwrap_or_default(),
            Ok(None) => ModrinthProject::default(),
            Err(e) => {
                debug!("Modrinth project metadata for {} unavailable: {:#}", project_id, e);
                ModrinthProject::default()
            }
        };

        Provenance {
            slug: project.slug.unwrap_or_default(),
            project_name: project.title.unwrap_or_default(),
            source_url: project.source_url.or(project.repository).unwrap_or_default(),
        }
    }
}

#[async_trait]
impl ReleaseSource for ModrinthSource {
    fn name(&self) -> &'static str {
        "Modrinth"
    }

    async fn lookup(&self, project_id: &str, minecraft_version: &str) -> Lookup {
        let url = match self.versions_url(project_id, minecraft_version) {
            Ok(url) => url,
            Err(e) => return e.into(),
        };

        let versions = match self.http.get_json(url.as_str(), HeaderMap::new()).await {
            Ok(Some(value)) => value,
            Ok(None) => return Lookup::NotFound,
            Err(e) => return e.into(),
        };

        let versions: Vec<ModrinthVersion> = match serde_json::from_value(versions) {
            Ok(versions) => versions,
            Err(e) => return Lookup::TransportError(format!("unexpected versions payload: {e}")),
        };

        let Some(version) = versions.into_iter().next() else {
            return Lookup::NotFound;
        };
        let Some(file) = version.files.into_iter().find(|f| is_archive_name(&f.filename)) else {
            return Lookup::NotFound;
        };

        let provenance = self.provenance(project_id).await;
        Lookup::Found(
            ReleaseCandidate::new(
                version.version_number,
                Stability::from_version_type(&version.version_type),
                file.url,
                file.filename,
            )
            .with_provenance(provenance),
        )
    }
}
