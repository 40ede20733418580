#![warn(missing_docs)]
#![warn(clippy::all)]

//! Repository Documenter - baseline documentation for a whole GitHub organization
//!
//! The library clones (or refreshes) every repository of an organization,
//! samples its text files, builds a single documentation prompt, asks a
//! language model for the documentation and splits the answer into a fixed
//! `docs/` tree inside each working copy.
//!
//! ## Pipeline
//! - Enumerate repositories (GitHub API, then the `gh` CLI, then manual entry)
//! - Clone or sync each working copy
//! - Sample files and detect the main technology
//! - Build the prompt and make one generation call
//! - Extract the five sections and write them, with placeholders where needed
//!
//! ## Usage
//! ```rust,no_run
//! use repo_documenter::{
//!     AnthropicClient, CloneStrategy, Config, ConfirmMode, RepoDocumenter, RepositorySync, RunMode,
//! };
//!
//! async fn example() -> repo_documenter::Result<()> {
//!     let config = Config::load(None)?;
//!     let generator = AnthropicClient::new(&config)?;
//!     let sync = RepositorySync::new(CloneStrategy::Git {
//!         token: config.api_keys.github_token.clone(),
//!     });
//!
//!     let documenter =
//!         RepoDocumenter::new(config, Box::new(generator), sync, ConfirmMode::AssumeYes)?;
//!     let summary = documenter
//!         .process_organization("https://github.com/acme", RunMode::Document)
//!         .await?;
//!     println!("{} repositories documented", summary.documented);
//!     Ok(())
//! }
//! ```

/// Repository analysis: file sampling, classification and technology detection
pub mod analysis;
/// Configuration loading and credentials
pub mod config;
/// Section extraction and the generated `docs/` tree
pub mod docs;
/// Per-organization orchestration
pub mod documenter;
/// Error handling types and utilities
pub mod error;
/// Cloning and refreshing working copies
pub mod git;
/// GitHub REST API client and `gh` CLI fallback
pub mod github;
/// Text generation services
pub mod llm;
/// Logging configuration and utilities
pub mod logging;
/// Documentation prompt construction
pub mod prompts;
/// Repository handles and metadata
pub mod repository;
/// Console output and prompts
pub mod ui;

// Re-export common types
pub use analysis::{FileSampler, RepositoryAnalysis};
pub use config::Config;
pub use docs::{save_documentation, write_documentation, SectionOutcome};
pub use documenter::{ConfirmMode, RepoDocumenter, RunMode, RunSummary};
pub use error::{DocumenterError, Result};
pub use git::{CloneStrategy, RepositorySync};
pub use llm::{generate_documentation, AnthropicClient, TextGenerator};
pub use prompts::{build_prompt, DocumentationRequest};
