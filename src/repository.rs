//! Repository identity and metadata shared by the enumeration, clone and
//! documentation steps.

use crate::error::{DocumenterError, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// Number of README characters shown in a repository summary
const README_PREVIEW_CHARS: usize = 500;

/// A repository selected for processing.
///
/// Built the same way whether it came from the GitHub API, the `gh` CLI or a
/// name typed by the user, so the clone step only ever sees this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle {
    /// Repository name
    pub name: String,
    /// Owning organization or user
    pub owner: String,
    /// HTTPS clone URL
    pub clone_url: String,
    /// Where the working copy lives
    pub local_path: PathBuf,
}

impl RepositoryHandle {
    /// Creates a handle whose working copy is `<output_dir>/<name>`
    pub fn new(owner: &str, name: &str, clone_url: Option<&str>, output_dir: &Path) -> Self {
        let clone_url = clone_url
            .map(str::to_string)
            .unwrap_or_else(|| format!("https://github.com/{}/{}.git", owner, name));
        Self {
            name: name.to_string(),
            owner: owner.to_string(),
            clone_url,
            local_path: output_dir.join(name),
        }
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Descriptive information about a repository, as reported by the hosting service
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryMetadata {
    /// Repository name
    pub name: String,
    /// Owning organization, when known
    pub owner: Option<String>,
    /// Free-text description
    pub description: Option<String>,
    /// Last update time
    pub updated_at: Option<DateTime<Utc>>,
    /// Star count
    pub stars: u64,
    /// Fork count
    pub forks: u64,
    /// HTTPS clone URL, when known
    pub clone_url: Option<String>,
    /// README text, when fetched
    pub readme: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiOwner {
    login: String,
}

/// Repository object from the GitHub REST API
#[derive(Debug, Deserialize)]
pub(crate) struct ApiRepository {
    name: String,
    owner: Option<ApiOwner>,
    description: Option<String>,
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    clone_url: Option<String>,
}

/// Repository object from `gh repo list/view --json`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CliRepository {
    name: String,
    description: Option<String>,
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    stargazer_count: u64,
    #[serde(default)]
    fork_count: u64,
}

impl From<ApiRepository> for RepositoryMetadata {
    fn from(repo: ApiRepository) -> Self {
        Self {
            name: repo.name,
            owner: repo.owner.map(|owner| owner.login),
            description: repo.description.filter(|d| !d.trim().is_empty()),
            updated_at: repo.updated_at,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            clone_url: repo.clone_url,
            readme: None,
        }
    }
}

impl From<CliRepository> for RepositoryMetadata {
    fn from(repo: CliRepository) -> Self {
        Self {
            name: repo.name,
            owner: None,
            description: repo.description.filter(|d| !d.trim().is_empty()),
            updated_at: repo.updated_at,
            stars: repo.stargazer_count,
            forks: repo.fork_count,
            clone_url: None,
            readme: None,
        }
    }
}

impl RepositoryMetadata {
    /// Metadata for a repository that is only known by name
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            owner: None,
            description: None,
            updated_at: None,
            stars: 0,
            forks: 0,
            clone_url: None,
            readme: None,
        }
    }

    /// Parses one repository object returned by the GitHub REST API
    pub fn from_api_json(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value::<ApiRepository>(value)?.into())
    }

    /// Parses one repository object printed by the GitHub CLI
    pub fn from_cli_json(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value::<CliRepository>(value)?.into())
    }

    /// Turns the metadata into a clonable handle, defaulting the owner to `org`
    pub fn to_handle(&self, org: &str, output_dir: &Path) -> RepositoryHandle {
        let owner = self.owner.as_deref().unwrap_or(org);
        RepositoryHandle::new(owner, &self.name, self.clone_url.as_deref(), output_dir)
    }

    /// Human readable summary shown before asking for confirmation
    pub fn summary(&self) -> String {
        let description = self.description.as_deref().unwrap_or("No description available");
        let last_updated = self
            .updated_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let mut summary = format!(
            "Repository: {}\nDescription: {}\nLast Updated: {}\nStars: {} | Forks: {}\n",
            self.name, description, last_updated, self.stars, self.forks
        );

        if let Some(readme) = &self.readme {
            let preview: String = readme.chars().take(README_PREVIEW_CHARS).collect();
            let ellipsis = if readme.chars().count() > README_PREVIEW_CHARS { "..." } else { "" };
            summary.push_str(&format!("\nREADME Preview:\n{}{}\n", preview, ellipsis));
        }

        summary
    }
}

/// Extracts the organization name from a GitHub organization URL
///
/// Accepts `https://github.com/org`, `https://github.com/orgs/org/...`,
/// `github.com/org` and a bare `org`.
pub fn extract_org_name(github_url: &str) -> Result<String> {
    let input = github_url.trim().trim_end_matches('/');
    if input.is_empty() {
        return Err(DocumenterError::Validation("Empty GitHub organization URL".into()));
    }

    let path = if input.contains("://") {
        Url::parse(input)?.path().to_string()
    } else if let Some((_, rest)) = input.split_once('/') {
        // "github.com/org" style input without a scheme
        if input.contains('.') && !rest.is_empty() {
            rest.to_string()
        } else {
            input.to_string()
        }
    } else {
        input.to_string()
    };

    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    let org = match parts.as_slice() {
        ["orgs", org, ..] => Some(*org),
        [org, ..] => Some(*org),
        [] => None,
    };

    match org {
        Some(org) if is_valid_owner(org) => Ok(org.to_string()),
        _ => Err(DocumenterError::Validation(format!(
            "Invalid GitHub organization URL: {}",
            github_url
        ))),
    }
}

fn is_valid_owner(name: &str) -> bool {
    !name.is_empty()
        && name != "orgs"
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}
