//! GitHub repository API client.

use forgefeed_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const USER_AGENT: &str = concat!("forgefeed/", env!("CARGO_PKG_VERSION"));

/// A repository as listed for the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoSummary {
    /// Upstream repository ID.
    pub id: i64,
    /// Short name.
    pub name: String,
    /// `owner/name` form.
    pub full_name: String,
    /// Repository description, if set.
    #[serde(default)]
    pub description: Option<String>,
    /// Primary language as detected upstream.
    #[serde(default)]
    pub language: Option<String>,
    /// Web URL of the repository.
    pub html_url: String,
}

/// One entry of a repository's root directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoEntry {
    /// File or directory name.
    pub name: String,
    /// Entry type as reported upstream ("file" or "dir").
    #[serde(rename = "type")]
    pub kind: String,
    /// Size in bytes. Directories report zero.
    #[serde(default)]
    pub size: u64,
}

impl RepoEntry {
    /// Whether this entry is a regular file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }
}

/// Client for the GitHub REST API, scoped to what the question pipeline
/// needs: the caller's repo list, root listings, and raw file contents.
#[derive(Clone)]
pub struct RepoClient {
    http: reqwest::Client,
    api_base: String,
}

impl RepoClient {
    /// Create a new client against the given API base URL.
    pub fn new(api_base: impl Into<String>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: api_base.into(),
        })
    }

    /// List the authenticated user's repositories, most recently updated
    /// first.
    pub async fn list_repos(&self, token: &str) -> AppResult<Vec<RepoSummary>> {
        let url = format!("{}/user/repos?sort=updated&per_page=50", self.api_base);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("GitHub API request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "GitHub API error: {}",
                response.status()
            )));
        }

        response
            .json::<Vec<RepoSummary>>()
            .await
            .map_err(|e| AppError::ExternalService(format!("GitHub API response invalid: {e}")))
    }

    /// Root directory listing of a repository. Any failure yields an empty
    /// listing so the question pipeline can proceed on partial context.
    pub async fn root_listing(&self, token: &str, full_name: &str) -> Vec<RepoEntry> {
        let url = format!("{}/repos/{}/contents/", self.api_base, full_name);
        let response = match self.http.get(&url).bearer_auth(token).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::debug!(repo = %full_name, status = %r.status(), "Root listing unavailable");
                return Vec::new();
            }
            Err(e) => {
                tracing::debug!(repo = %full_name, error = %e, "Root listing request failed");
                return Vec::new();
            }
        };

        response.json::<Vec<RepoEntry>>().await.unwrap_or_default()
    }

    /// Raw content of a file in a repository. Any failure, including a
    /// missing file, yields `None`.
    pub async fn file_content(&self, token: &str, full_name: &str, path: &str) -> Option<String> {
        if path.is_empty() {
            return None;
        }

        let url = format!("{}/repos/{}/contents/{}", self.api_base, full_name, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header("Accept", "application/vnd.github.v3.raw")
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        response.text().await.ok()
    }
}
