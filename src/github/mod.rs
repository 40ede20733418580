//! GitHub access: the REST API client and the `gh` command line fallback.

/// `gh` command line wrapper
pub mod cli;

use crate::error::{DocumenterError, Result};
use crate::repository::RepositoryMetadata;
use log::{debug, info, warn};
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

pub use cli::GhCli;

const GITHUB_API_BASE: &str = "https://api.github.com";
const API_TIMEOUT_SECS: u64 = 30;
const PER_PAGE: usize = 100;

fn github_api_base() -> String {
    std::env::var("GITHUB_API_BASE_URL").unwrap_or_else(|_| GITHUB_API_BASE.to_string())
}

/// Thin client over the parts of the GitHub REST API the documenter needs
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    /// Creates a client against `GITHUB_API_BASE_URL` (or api.github.com)
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(token, &github_api_base())
    }

    /// Creates a client against an explicit API base URL
    pub fn with_base_url(token: Option<String>, base_url: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("repo-documenter"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .map_err(|e| DocumenterError::Network(e.to_string()))?;

        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.header(header::AUTHORIZATION, format!("token {}", token)),
            None => request,
        }
    }

    /// Lists every repository of an organization, following pagination
    pub async fn list_org_repositories(&self, org: &str) -> Result<Vec<RepositoryMetadata>> {
        let mut repositories = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/orgs/{}/repos?page={}&per_page={}",
                self.base_url, org, page, PER_PAGE
            );
            debug!("Fetching {}", url);

            let response = self.get(&url).send().await?;
            let body: Value = check_status(response, org).await?.json().await?;
            let items = body
                .as_array()
                .ok_or_else(|| DocumenterError::Parse("Invalid repository list response".into()))?;

            if items.is_empty() {
                break;
            }
            let last_page = items.len() < PER_PAGE;
            for item in items {
                repositories.push(RepositoryMetadata::from_api_json(item.clone())?);
            }
            if last_page {
                break;
            }
            page += 1;
        }

        info!("Found {} repositories in organization {}", repositories.len(), org);
        Ok(repositories)
    }

    /// Fetches the raw README of a repository, `None` when it has none
    pub async fn fetch_readme(&self, owner: &str, repo: &str) -> Result<Option<String>> {
        let url = format!("{}/repos/{}/{}/readme", self.base_url, owner, repo);
        let response = self
            .get(&url)
            .header(header::ACCEPT, "application/vnd.github.raw")
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response, &format!("{}/{}", owner, repo)).await?;
        Ok(Some(response.text().await?))
    }

    /// Adds the README to the metadata; failures only cost the preview
    pub async fn attach_readme(&self, mut metadata: RepositoryMetadata, org: &str) -> RepositoryMetadata {
        let owner = metadata.owner.clone().unwrap_or_else(|| org.to_string());
        match self.fetch_readme(&owner, &metadata.name).await {
            Ok(readme) => metadata.readme = readme,
            Err(e) => warn!("Could not fetch README for {}/{}: {}", owner, metadata.name, e),
        }
        metadata
    }
}

async fn check_status(response: Response, subject: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let remaining = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.text().await.unwrap_or_default();

    match status {
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS if remaining.as_deref() == Some("0") => {
            Err(DocumenterError::RateLimitExceeded(format!("GitHub API rate limit reached while reading {}", subject)))
        }
        StatusCode::NOT_FOUND => Err(DocumenterError::GitHubApi(format!("{} not found", subject))),
        _ => Err(DocumenterError::GitHubApi(format!(
            "request for {} failed: HTTP {} {}",
            subject,
            status,
            body.trim()
        ))),
    }
}
