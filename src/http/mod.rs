//! HTTP transport shared by every release source and the downloader.
//!
//! Two entry points:
//! - [`HttpClient::get_json`]: fetch and parse a JSON document. An empty body,
//!   an invalid body or a `404` yield `Ok(None)`; only transport failures and
//!   unexpected statuses are errors.
//! - [`HttpClient::download_to_file`]: stream a file to disk, following at most
//!   [`MAX_REDIRECTS`] redirects by hand and never leaving a partial file
//!   behind.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::{StatusCode, Url, redirect};
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

use crate::constants::MAX_REDIRECTS;
use crate::core::ModupError;

/// Thin wrapper around two `reqwest` clients.
///
/// API calls use reqwest's own redirect handling; downloads disable it so the
/// redirect bound and error messages stay under our control.
#[derive(Debug, Clone)]
pub struct HttpClient {
    api: reqwest::Client,
    download: reqwest::Client,
}

impl HttpClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        let api = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .context("Failed to build HTTP client")?;

        let download = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(redirect::Policy::none())
            .build()
            .context("Failed to build download client")?;

        Ok(Self {
            api,
            download,
        })
    }

    /// GET `url` and parse the body as JSON.
    ///
    /// Returns `Ok(None)` for `404`, an empty body, or a body that is not
    /// valid JSON (logged as a warning). Connection failures and other
    /// non-success statuses are returned as errors so callers can tell
    /// "nothing there" from "could not ask".
    pub async fn get_json(&self, url: &str, headers: HeaderMap) -> Result<Option<Value>> {
        debug!("GET {}", url);
        let response = self
            .api
            .get(url)
            .headers(headers)
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("{} returned 404", url);
            return Ok(None);
        }
        if !status.is_success() {
            anyhow::bail!("{url} returned HTTP {status}");
        }

        let body =
            response.text().await.with_context(|| format!("Failed to read body from {url}"))?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Failed to parse JSON from {}: {}", url, e);
                Ok(None)
            }
        }
    }

    /// Download `url` into `dest`.
    ///
    /// Follows `301/302/303/307/308` responses up to [`MAX_REDIRECTS`] times,
    /// resolving relative `Location` headers against the current URL. Any
    /// status other than `200` fails. The body is written to a temporary file
    /// next to `dest` and renamed into place only once complete.
    pub async fn download_to_file(&self, url: &str, dest: &Path) -> Result<()> {
        let mut current = Url::parse(url).map_err(|e| ModupError::DownloadFailed {
            url: url.to_string(),
            reason: format!("invalid URL: {e}"),
        })?;
        let mut redirects = 0;

        let mut response = loop {
            let response = self.download.get(current.clone()).send().await.map_err(|e| {
                ModupError::DownloadFailed {
                    url: current.to_string(),
                    reason: e.to_string(),
                }
            })?;

            let status = response.status();
            if !is_followed_redirect(status) {
                if status != StatusCode::OK {
                    return Err(ModupError::DownloadFailed {
                        url: current.to_string(),
                        reason: format!("HTTP {}", status.as_u16()),
                    }
                    .into());
                }
                break response;
            }

            if redirects >= MAX_REDIRECTS {
                return Err(ModupError::TooManyRedirects {
                    url: url.to_string(),
                }
                .into());
            }

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| ModupError::DownloadFailed {
                    url: current.to_string(),
                    reason: "redirect with no location header".to_string(),
                })?;

            let next = current.join(location).map_err(|e| ModupError::DownloadFailed {
                url: current.to_string(),
                reason: format!("invalid redirect location '{location}': {e}"),
            })?;
            debug!("Redirect {} -> {}", current, next);
            current = next;
            redirects += 1;
        };

        let parent = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        crate::utils::ensure_dir(parent)?;

        // Dropped (and deleted) on every early return below
        let mut temp = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;

        while let Some(chunk) = response.chunk().await.map_err(|e| ModupError::DownloadFailed {
            url: current.to_string(),
            reason: e.to_string(),
        })? {
            temp.write_all(&chunk)
                .with_context(|| format!("Failed to write download for {}", dest.display()))?;
        }
        temp.flush()?;

        temp.persist(dest)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to move download into {}", dest.display()))?;

        debug!("Downloaded {} to {}", url, dest.display());
        Ok(())
    }
}

const fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> HttpClient {
        HttpClient::new("modup-test").unwrap()
    }

    #[tokio::test]
    async fn test_get_json_parses_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/abc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"slug":"sodium"}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let value = client()
            .get_json(&format!("{}/project/abc", server.uri()), HeaderMap::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value["slug"], "sodium");
    }

    #[tokio::test]
    async fn test_get_json_empty_invalid_and_missing_are_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_string("   "))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let http = client();
        for route in ["/empty", "/garbage", "/missing"] {
            let url = format!("{}{}", server.uri(), route);
            assert!(http.get_json(&url, HeaderMap::new()).await.unwrap().is_none(), "{route}");
        }
    }

    #[tokio::test]
    async fn test_get_json_server_error_is_err() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(client().get_json(&server.uri(), HeaderMap::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_download_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/start"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/hop"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/hop"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("location", format!("{}/file.jar", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/file.jar"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jar-bytes".to_vec()))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("mods").join("file.jar");
        client().download_to_file(&format!("{}/start", server.uri()), &dest).await.unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"jar-bytes");
    }

    #[tokio::test]
    async fn test_download_redirect_loop_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/loop"))
            .respond_with(ResponseTemplate::new(307).insert_header("location", "/loop"))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("x.jar");
        let err = client()
            .download_to_file(&format!("{}/loop", server.uri()), &dest)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModupError>(),
            Some(ModupError::TooManyRedirects { .. })
        ));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_download_error_status_and_missing_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/nowhere"))
            .respond_with(ResponseTemplate::new(302))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("x.jar");
        let http = client();

        let err = http.download_to_file(&format!("{}/gone", server.uri()), &dest).await.unwrap_err();
        assert!(err.to_string().contains("410"));

        let err =
            http.download_to_file(&format!("{}/nowhere", server.uri()), &dest).await.unwrap_err();
        assert!(err.to_string().contains("no location header"));
        assert!(!dest.exists());
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
