use crate::error::{DocumenterError, Result};
use crate::repository::RepositoryMetadata;
use log::debug;
use serde_json::Value;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

/// Fields requested from `gh repo list/view`
const JSON_FIELDS: &str = "name,description,updatedAt,stargazerCount,forkCount";

/// Wrapper around the GitHub CLI, used when the REST API is unavailable
/// (for example behind SAML enforcement)
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
}

impl Default for GhCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GhCli {
    /// Uses `gh` from `PATH`
    pub fn new() -> Self {
        Self::with_program("gh")
    }

    /// Uses a specific executable
    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    /// Executable name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Checks if the GitHub CLI is installed
    pub async fn is_available(&self) -> bool {
        TokioCommand::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Lists up to `limit` repositories of an organization
    pub async fn list_repositories(&self, org: &str, limit: usize) -> Result<Vec<RepositoryMetadata>> {
        let limit = limit.to_string();
        let stdout = self
            .run(&["repo", "list", org, "--limit", &limit, "--json", JSON_FIELDS])
            .await?;
        parse_repo_list(&stdout)
    }

    /// Fetches metadata of a single `owner/name` repository
    pub async fn view_repository(&self, full_name: &str) -> Result<RepositoryMetadata> {
        let stdout = self.run(&["repo", "view", full_name, "--json", JSON_FIELDS]).await?;
        RepositoryMetadata::from_cli_json(serde_json::from_str(&stdout)?)
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        debug!("Running {} {}", self.program, args.join(" "));
        let output = TokioCommand::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            return Err(DocumenterError::GitCommand(format!(
                "{} {} exited with {:?}: {}",
                self.program,
                args.first().copied().unwrap_or_default(),
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parses the JSON array printed by `gh repo list --json`
pub(crate) fn parse_repo_list(stdout: &str) -> Result<Vec<RepositoryMetadata>> {
    let value: Value = serde_json::from_str(stdout.trim())?;
    match value {
        Value::Array(items) => items.into_iter().map(RepositoryMetadata::from_cli_json).collect(),
        _ => Err(DocumenterError::Parse("Expected a JSON array from gh repo list".into())),
    }
}
