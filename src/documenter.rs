//! Orchestration: enumerate an organization's repositories, confirm each one,
//! bring its working copy up to date and run the documentation pipeline.

use crate::analysis::FileSampler;
use crate::config::Config;
use crate::docs::{create_documentation_structure, save_documentation};
use crate::error::Result;
use crate::git::RepositorySync;
use crate::github::{GhCli, GitHubClient};
use crate::llm::{generate_documentation, TextGenerator};
use crate::prompts::DocumentationRequest;
use crate::repository::{extract_org_name, RepositoryMetadata};
use crate::ui::UI;
use log::{error, info, warn};
use std::path::Path;

/// Upper bound on repositories listed through the GitHub CLI
pub const GH_LIST_LIMIT: usize = 100;

/// What to do with each repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Clone, then generate documentation
    Document,
    /// Clone and create the empty `docs/` tree only
    CloneOnly,
}

/// Whether each repository needs a confirmation from the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmMode {
    /// Ask before every repository, and allow manual name entry
    Interactive,
    /// Process everything without asking
    AssumeYes,
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Repositories whose documentation was written
    pub documented: usize,
    /// Repositories cloned in clone-only mode
    pub cloned_only: usize,
    /// Repositories declined at the confirmation prompt
    pub skipped: usize,
    /// Names of repositories that failed to clone or document
    pub failed: Vec<String>,
}

impl RunSummary {
    /// Repositories that were attempted
    pub fn processed(&self) -> usize {
        self.documented + self.cloned_only + self.failed.len()
    }

    /// True when no repository failed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs the documentation pipeline over the repositories of an organization
pub struct RepoDocumenter {
    config: Config,
    generator: Option<Box<dyn TextGenerator>>,
    sync: RepositorySync,
    confirm_mode: ConfirmMode,
    github: GitHubClient,
    gh_cli: Option<GhCli>,
    sampler: FileSampler,
    ui: UI,
}

impl RepoDocumenter {
    /// Creates a documenter; fails on invalid exclusion patterns
    pub fn new(
        config: Config,
        generator: Box<dyn TextGenerator>,
        sync: RepositorySync,
        confirm_mode: ConfirmMode,
    ) -> Result<Self> {
        Self::build(config, Some(generator), sync, confirm_mode)
    }

    /// Creates a documenter for clone-only runs, which never generate text
    pub fn without_generator(
        config: Config,
        sync: RepositorySync,
        confirm_mode: ConfirmMode,
    ) -> Result<Self> {
        Self::build(config, None, sync, confirm_mode)
    }

    fn build(
        config: Config,
        generator: Option<Box<dyn TextGenerator>>,
        sync: RepositorySync,
        confirm_mode: ConfirmMode,
    ) -> Result<Self> {
        let github = GitHubClient::new(config.api_keys.github_token.clone())?;
        let gh_cli = match config.use_gh_cli {
            Some(false) => None,
            _ => Some(GhCli::new()),
        };
        let sampler = FileSampler::from_config(&config)?;

        Ok(Self {
            config,
            generator,
            sync,
            confirm_mode,
            github,
            gh_cli,
            sampler,
            ui: UI::new(),
        })
    }

    /// Replaces the GitHub API client
    pub fn with_github_client(mut self, github: GitHubClient) -> Self {
        self.github = github;
        self
    }

    /// Replaces (or disables, with `None`) the GitHub CLI fallback
    pub fn with_gh_cli(mut self, gh_cli: Option<GhCli>) -> Self {
        self.gh_cli = gh_cli;
        self
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Processes every repository of the organization at `org_url`
    pub async fn process_organization(&self, org_url: &str, mode: RunMode) -> Result<RunSummary> {
        let org = extract_org_name(org_url)?;
        info!("Processing organization: {}", org);

        let repositories = self.list_repositories(&org).await?;
        if repositories.is_empty() {
            warn!("No repositories to process for {}", org);
            self.ui.print_warning("No repositories found or provided.");
            return Ok(RunSummary::default());
        }

        self.process_all(&org, repositories, mode).await
    }

    /// Processes an explicit list of repository names
    pub async fn process_repositories(
        &self,
        org: &str,
        names: &[String],
        mode: RunMode,
    ) -> Result<RunSummary> {
        let mut repositories = Vec::with_capacity(names.len());
        for name in names {
            repositories.push(self.describe(org, name).await);
        }
        self.process_all(org, repositories, mode).await
    }

    async fn list_repositories(&self, org: &str) -> Result<Vec<RepositoryMetadata>> {
        match self.github.list_org_repositories(org).await {
            Ok(repositories) if !repositories.is_empty() => return Ok(repositories),
            Ok(_) => warn!("GitHub API returned no repositories for {}", org),
            Err(e) => warn!("Failed to list repositories through the GitHub API: {}", e),
        }

        if let Some(gh) = &self.gh_cli {
            if gh.is_available().await {
                info!("Falling back to the GitHub CLI");
                match gh.list_repositories(org, GH_LIST_LIMIT).await {
                    Ok(repositories) if !repositories.is_empty() => return Ok(repositories),
                    Ok(_) => warn!("GitHub CLI returned no repositories for {}", org),
                    Err(e) => warn!("Failed to list repositories with the GitHub CLI: {}", e),
                }
            } else {
                warn!("GitHub CLI is not available");
            }
        }

        if self.confirm_mode == ConfirmMode::Interactive {
            info!("Prompting for repository names");
            let names = self.ui.ask_repository_names()?;
            return Ok(names.iter().map(|name| RepositoryMetadata::named(name)).collect());
        }

        Ok(Vec::new())
    }

    async fn describe(&self, org: &str, name: &str) -> RepositoryMetadata {
        if let Some(gh) = &self.gh_cli {
            match gh.view_repository(&format!("{}/{}", org, name)).await {
                Ok(mut metadata) => {
                    metadata.owner = Some(org.to_string());
                    return metadata;
                }
                Err(e) => warn!("Could not read metadata of {}/{}: {}", org, name, e),
            }
        }
        RepositoryMetadata::named(name)
    }

    async fn process_all(
        &self,
        org: &str,
        repositories: Vec<RepositoryMetadata>,
        mode: RunMode,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let total = repositories.len();
        info!("Processing {} repositories from {}", total, org);

        for (index, metadata) in repositories.into_iter().enumerate() {
            let metadata = self.github.attach_readme(metadata, org).await;
            self.ui.print_repository(&metadata);

            if !self.confirmed(&metadata.name)? {
                info!("Skipping {}", metadata.name);
                summary.skipped += 1;
                continue;
            }

            self.process_one(org, &metadata, mode, &mut summary).await;

            if index + 1 < total {
                tokio::time::sleep(self.config.delay_between_repos()).await;
            }
        }

        info!(
            "Finished {}: {} documented, {} cloned, {} skipped, {} failed",
            org,
            summary.documented,
            summary.cloned_only,
            summary.skipped,
            summary.failed.len()
        );
        Ok(summary)
    }

    fn confirmed(&self, name: &str) -> Result<bool> {
        match self.confirm_mode {
            ConfirmMode::AssumeYes => Ok(true),
            ConfirmMode::Interactive => self.ui.confirm(&format!("Process {}?", name)),
        }
    }

    async fn process_one(
        &self,
        org: &str,
        metadata: &RepositoryMetadata,
        mode: RunMode,
        summary: &mut RunSummary,
    ) {
        let handle = metadata.to_handle(org, &self.config.output_dir);

        let pb = self.ui.create_progress_bar(&format!("Syncing {}", handle.full_name()));
        let synced = self.sync.sync(&handle).await;
        pb.finish_and_clear();

        if let Err(e) = synced {
            error!("Failed to clone {}: {}", handle.full_name(), e);
            self.ui.print_error(&format!("Failed to clone {}", handle.full_name()));
            summary.failed.push(metadata.name.clone());
            return;
        }

        match mode {
            RunMode::CloneOnly => match create_documentation_structure(&handle.local_path) {
                Ok(docs_dir) => {
                    info!("Created documentation structure at {}", docs_dir.display());
                    summary.cloned_only += 1;
                }
                Err(e) => {
                    error!("Failed to create docs for {}: {}", metadata.name, e);
                    summary.failed.push(metadata.name.clone());
                }
            },
            RunMode::Document => {
                if self.document_repository(&handle.local_path).await {
                    self.ui.print_info(&format!("Documented {}", metadata.name));
                    summary.documented += 1;
                } else {
                    self.ui.print_error(&format!("Failed to document {}", metadata.name));
                    summary.failed.push(metadata.name.clone());
                }
            }
        }
    }

    /// Documents one working copy: structure, analysis, prompt, generation, save
    pub async fn document_repository(&self, repo_path: &Path) -> bool {
        let repo_name = repo_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| repo_path.display().to_string());
        let Some(generator) = self.generator.as_deref() else {
            error!("No text generator configured, cannot document {}", repo_name);
            return false;
        };
        info!("Generating documentation for {}", repo_name);

        let docs_dir = match create_documentation_structure(repo_path) {
            Ok(docs_dir) => docs_dir,
            Err(e) => {
                error!("Error creating documentation structure for {}: {}", repo_name, e);
                return false;
            }
        };

        let analysis = self.sampler.analyze(repo_path);
        let request = DocumentationRequest::new(&repo_name, &analysis);

        let pb = self
            .ui
            .create_progress_bar(&format!("Generating documentation for {}", repo_name));
        let text = generate_documentation(generator, &request).await;
        pb.finish_and_clear();

        save_documentation(&docs_dir, &text)
    }
}
