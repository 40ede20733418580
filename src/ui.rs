use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use crate::error::{DocumenterError, Result};
use crate::repository::RepositoryMetadata;

/// Console output and prompts
pub struct UI {
    theme: ColorfulTheme,
    attended: bool,
}

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}

impl UI {
    /// Creates the console, detecting whether a terminal is attached
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
            attended: console::user_attended(),
        }
    }

    /// Whether a person is watching the terminal
    pub fn is_attended(&self) -> bool {
        self.attended
    }

    /// Asks a yes/no question, defaulting to yes
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(true)
            .interact()
            .map_err(DocumenterError::from)
    }

    /// Asks for a comma-separated list of repository names
    pub fn ask_repository_names(&self) -> Result<Vec<String>> {
        self.print_warning("\nUnable to automatically list repositories.");
        let input = Input::<String>::with_theme(&self.theme)
            .with_prompt("Repository names to clone and document (comma-separated)")
            .allow_empty(true)
            .interact_text()?;
        Ok(parse_repository_names(&input))
    }

    /// Spinner for a long step; hidden when nobody is watching
    pub fn create_progress_bar(&self, message: &str) -> ProgressBar {
        if !self.attended {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            pb.set_style(style.tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓",
            ]));
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(message.to_string());
        pb
    }

    /// Prints the title banner
    pub fn print_banner(&self) {
        let border = "=".repeat(52);
        println!("{}", border.blue());
        println!("  {}", "Repository Documenter".bold().green());
        println!("  {}", "Baseline docs for every repository in an organization".dimmed());
        println!("{}", border.blue());
    }

    /// Prints a success or progress message in green
    pub fn print_info(&self, message: &str) {
        println!("{}", message.green());
    }

    /// Prints a warning in yellow
    pub fn print_warning(&self, message: &str) {
        println!("{}", message.yellow());
    }

    /// Prints an error in red to stderr
    pub fn print_error(&self, message: &str) {
        eprintln!("{}", message.red());
    }

    /// Prints a boxed section title
    pub fn print_section(&self, title: &str) {
        let width = title.chars().count() + 4;
        let border = "=".repeat(width);

        println!("\n{}", border.bright_blue());
        println!("  {}", title.bright_white().bold());
        println!("{}\n", border.bright_blue());
    }

    /// Prints the summary shown before a repository is processed
    pub fn print_repository(&self, metadata: &RepositoryMetadata) {
        self.print_section(&metadata.name);
        println!("{}", metadata.summary());
    }
}

/// Splits comma-separated input into trimmed, non-empty names
pub fn parse_repository_names(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repository_names() {
        assert_eq!(
            parse_repository_names(" api, web ,,worker "),
            vec!["api", "web", "worker"]
        );
        assert!(parse_repository_names("  ").is_empty());
    }
}
