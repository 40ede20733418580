mod env_manager;

use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::{DocumenterError, Result};
use log::debug;
use regex::Regex;
use std::fs;

pub use env_manager::{get_env_value, ApiKeys, ANTHROPIC_API_KEY_VAR, GITHUB_TOKEN_VAR};

/// Default model used for documentation generation
pub const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";
/// Default Anthropic API endpoint
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Main configuration struct for the application
///
/// Values come from (lowest to highest precedence) built-in defaults, the
/// TOML config file, `.env`/environment variables and command line flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory that receives one working copy per repository
    pub output_dir: PathBuf,
    /// Credentials for GitHub and the generation service
    pub api_keys: ApiKeys,
    /// Text generation settings
    pub llm: LlmSettings,
    /// File sampling limits
    pub sampling: SamplingConfig,
    /// Fixed pause between two repositories, in milliseconds
    pub delay_between_repos_ms: u64,
    /// Force (`true`) or forbid (`false`) the GitHub CLI; auto-detect when unset
    pub use_gh_cli: Option<bool>,
    /// Regex patterns for repository paths that are never sampled
    pub excluded_files: Vec<String>,
    /// File that receives a plain copy of every log line
    pub log_file: Option<PathBuf>,
}

/// Settings for the text generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model identifier
    pub model: String,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// API base URL
    pub base_url: String,
    /// Request timeout
    pub timeout_seconds: u64,
}

/// Limits applied while walking a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Files larger than this many bytes are not sampled
    pub max_file_size: u64,
}

impl Config {
    /// Creates a new configuration with the specified output directory
    ///
    /// # Arguments
    /// * `output_dir` - The directory where repositories are cloned
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            api_keys: ApiKeys::default(),
            llm: LlmSettings::default(),
            sampling: SamplingConfig::default(),
            delay_between_repos_ms: 1000,
            use_gh_cli: None,
            excluded_files: vec![
                r"(^|/)node_modules/".to_string(),
                r"(^|/)__pycache__/".to_string(),
            ],
            log_file: Some(PathBuf::from("repo_documenter.log")),
        }
    }

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("repo-documenter").join("config.toml"))
    }

    /// Loads configuration from `path`, or from the default config file location
    ///
    /// A missing default file yields the default configuration; a missing
    /// explicit file is an error. Environment variables are applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env();
        Ok(config)
    }

    /// Parses a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| DocumenterError::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Applies environment variable overrides
    pub fn apply_env(&mut self) {
        self.api_keys = self.api_keys.clone().overridden_by(ApiKeys::from_env());
        if let Some(model) = get_env_value("ANTHROPIC_MODEL") {
            self.llm.model = model;
        }
        if let Some(base_url) = get_env_value("ANTHROPIC_BASE_URL") {
            self.llm.base_url = base_url;
        }
    }

    /// Validates the configuration by ensuring the output directory exists and tokens are present
    ///
    /// `require_generation_key` is false for clone-only runs.
    pub async fn validate(&self, require_generation_key: bool) -> Result<()> {
        self.ensure_tokens(require_generation_key)?;
        self.exclusion_patterns()?;
        self.ensure_directories_exist().await?;
        Ok(())
    }

    /// Ensures the output directory exists
    pub async fn ensure_directories_exist(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        Ok(())
    }

    /// Validates that all required API tokens are present
    pub fn ensure_tokens(&self, require_generation_key: bool) -> Result<()> {
        self.github_token()?;
        if require_generation_key {
            self.anthropic_api_key()?;
        }
        Ok(())
    }

    /// Retrieves the GitHub token from the configuration
    pub fn github_token(&self) -> Result<&str> {
        self.api_keys.github_token.as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| DocumenterError::Config(format!(
                "{} is not set. Add it to your environment or .env file", GITHUB_TOKEN_VAR
            )))
    }

    /// Retrieves the Anthropic API key from the configuration
    pub fn anthropic_api_key(&self) -> Result<&str> {
        self.api_keys.anthropic_api_key.as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| DocumenterError::Config(format!(
                "{} is not set. Add it to your environment or .env file", ANTHROPIC_API_KEY_VAR
            )))
    }

    /// Compiles the exclusion patterns
    pub fn exclusion_patterns(&self) -> Result<Vec<Regex>> {
        self.excluded_files
            .iter()
            .map(|pattern| Regex::new(pattern).map_err(DocumenterError::from))
            .collect()
    }

    /// Pause inserted between repositories
    pub fn delay_between_repos(&self) -> Duration {
        Duration::from_millis(self.delay_between_repos_ms)
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4000,
            temperature: 0.0,
            base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            timeout_seconds: 300,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_file_size: 1_000_000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(PathBuf::from("repositories"))
    }
}
