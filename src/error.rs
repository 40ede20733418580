use thiserror::Error;
use std::io;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, DocumenterError>;

/// Errors that can occur while enumerating, cloning or documenting repositories
#[derive(Debug, Error)]
pub enum DocumenterError {
    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration file parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid exclusion pattern
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Network connectivity errors
    #[error("Network error: {0}")]
    Network(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// API rate limit exceeded errors
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// GitHub API specific errors
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Failures of the `git` or `gh` command line tools
    #[error("Git command failed: {0}")]
    GitCommand(String),

    /// Language Model errors
    #[error("LLM error: {0}")]
    LLM(String),

    /// Parsing errors
    #[error("Parsing error: {0}")]
    Parse(String),
}

impl DocumenterError {
    /// Configuration problems stop the whole run before any repository is touched
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Toml(_) | Self::Pattern(_) | Self::Validation(_))
    }
}
