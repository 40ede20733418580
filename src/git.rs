//! Clone/sync collaborator: makes sure a repository's working copy exists
//! locally and is reasonably fresh.

use crate::error::{DocumenterError, Result};
use crate::repository::RepositoryHandle;
use log::{info, warn};
use std::ffi::OsString;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;
use url::Url;

/// How working copies are obtained
#[derive(Debug, Clone)]
pub enum CloneStrategy {
    /// `gh repo clone` / `gh repo sync`, which handles SAML-protected organizations
    GhCli {
        /// `gh` executable
        program: String,
    },
    /// Plain `git clone` / `git pull` with the token embedded in the clone URL
    Git {
        /// Token used for private repositories
        token: Option<String>,
    },
}

/// Keeps local working copies in sync with their remotes
#[derive(Debug, Clone)]
pub struct RepositorySync {
    strategy: CloneStrategy,
}

impl RepositorySync {
    /// Creates a sync helper using the given strategy
    pub fn new(strategy: CloneStrategy) -> Self {
        Self { strategy }
    }

    /// Ensures `handle.local_path` contains a working copy.
    ///
    /// Clones when the directory is missing. When it already exists the copy is
    /// refreshed; a failed refresh is logged and the existing files are used.
    pub async fn sync(&self, handle: &RepositoryHandle) -> Result<()> {
        if handle.local_path.exists() {
            info!(
                "Repository already exists at {}, pulling latest changes",
                handle.local_path.display()
            );
            if let Err(e) = self.refresh(handle).await {
                warn!("Failed to pull latest changes for {}: {}", handle.full_name(), e);
                warn!("Continuing with existing repository files");
            }
            return Ok(());
        }

        if let Some(parent) = handle.local_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        info!("Cloning repository {} to {}", handle.full_name(), handle.local_path.display());
        self.clone_fresh(handle).await
    }

    async fn clone_fresh(&self, handle: &RepositoryHandle) -> Result<()> {
        let target: OsString = handle.local_path.clone().into_os_string();
        match &self.strategy {
            CloneStrategy::GhCli { program } => {
                let args = vec![
                    OsString::from("repo"),
                    OsString::from("clone"),
                    OsString::from(handle.full_name()),
                    target,
                ];
                run(program, &args, None).await
            }
            CloneStrategy::Git { token } => {
                let url = authenticated_clone_url(&handle.clone_url, token.as_deref())?;
                let args = vec![OsString::from("clone"), OsString::from(url), target];
                run("git", &args, token.as_deref()).await
            }
        }
    }

    async fn refresh(&self, handle: &RepositoryHandle) -> Result<()> {
        match &self.strategy {
            CloneStrategy::GhCli { program } => {
                let mut command = TokioCommand::new(program);
                command
                    .args(["repo", "sync"])
                    .current_dir(&handle.local_path);
                execute(command, program, None).await
            }
            CloneStrategy::Git { .. } => {
                let args = vec![
                    OsString::from("-C"),
                    handle.local_path.clone().into_os_string(),
                    OsString::from("pull"),
                    OsString::from("--ff-only"),
                ];
                run("git", &args, None).await
            }
        }
    }
}

async fn run(program: &str, args: &[OsString], secret: Option<&str>) -> Result<()> {
    let mut command = TokioCommand::new(program);
    command.args(args);
    execute(command, program, secret).await
}

async fn execute(mut command: TokioCommand, program: &str, secret: Option<&str>) -> Result<()> {
    let output = command
        .stdin(Stdio::null())
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .await?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = match secret {
        Some(secret) if !secret.is_empty() => stderr.replace(secret, "***"),
        _ => stderr.into_owned(),
    };
    Err(DocumenterError::GitCommand(format!(
        "{} exited with {:?}: {}",
        program,
        output.status.code(),
        stderr.trim()
    )))
}

/// Embeds the token into an HTTPS clone URL
pub fn authenticated_clone_url(clone_url: &str, token: Option<&str>) -> Result<String> {
    let token = match token {
        Some(token) if !token.is_empty() => token,
        _ => return Ok(clone_url.to_string()),
    };

    let mut url = Url::parse(clone_url)?;
    if url.scheme() != "https" {
        return Ok(clone_url.to_string());
    }
    url.set_username("x-access-token")
        .and_then(|_| url.set_password(Some(token)))
        .map_err(|_| DocumenterError::Validation(format!("Cannot add credentials to {}", clone_url)))?;
    Ok(url.to_string())
}
