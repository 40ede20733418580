use dialoguer::Password;
use serde::{Serialize, Deserialize};
use crate::error::{DocumenterError, Result};

/// Environment variable holding the GitHub personal access token
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
/// Environment variable holding the Anthropic API key
pub const ANTHROPIC_API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Stores API keys for the hosting service and the generation service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeys {
    /// GitHub API token for authenticated requests and private clones
    pub github_token: Option<String>,
    /// Anthropic API key used for documentation generation
    pub anthropic_api_key: Option<String>,
}

impl ApiKeys {
    /// Reads the keys from the process environment (after `.env` has been loaded)
    pub fn from_env() -> Self {
        Self {
            github_token: get_env_value(GITHUB_TOKEN_VAR),
            anthropic_api_key: get_env_value(ANTHROPIC_API_KEY_VAR),
        }
    }

    /// Returns a copy where every key present in `overrides` replaces ours
    pub fn overridden_by(self, overrides: ApiKeys) -> Self {
        Self {
            github_token: overrides.github_token.or(self.github_token),
            anthropic_api_key: overrides.anthropic_api_key.or(self.anthropic_api_key),
        }
    }

    /// Prompts the user to input any missing API keys
    pub fn prompt_missing_keys(&mut self, require_generation_key: bool) -> Result<()> {
        if self.github_token.is_none() {
            self.github_token = prompt_secret("Enter GitHub token")?;
        }
        if require_generation_key && self.anthropic_api_key.is_none() {
            self.anthropic_api_key = prompt_secret("Enter Anthropic API key")?;
        }
        Ok(())
    }
}

fn prompt_secret(prompt: &str) -> Result<Option<String>> {
    Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map(|s| if s.trim().is_empty() { None } else { Some(s.trim().to_string()) })
        .map_err(|e| DocumenterError::Config(e.to_string()))
}

/// Reads an environment variable, treating empty values as unset
pub fn get_env_value(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_take_precedence_but_keep_missing_keys() {
        let file_keys = ApiKeys {
            github_token: Some("from-file".into()),
            anthropic_api_key: Some("file-key".into()),
        };
        let env_keys = ApiKeys {
            github_token: Some("from-env".into()),
            anthropic_api_key: None,
        };

        let merged = file_keys.overridden_by(env_keys);
        assert_eq!(merged.github_token.as_deref(), Some("from-env"));
        assert_eq!(merged.anthropic_api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn empty_env_values_are_unset() {
        std::env::set_var("REPO_DOCUMENTER_TEST_EMPTY", "  ");
        assert_eq!(get_env_value("REPO_DOCUMENTER_TEST_EMPTY"), None);
        std::env::remove_var("REPO_DOCUMENTER_TEST_EMPTY");
    }
}
