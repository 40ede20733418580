#![allow(dead_code)]

use async_trait::async_trait;
use repo_documenter::config::Config;
use repo_documenter::error::{DocumenterError, Result};
use repo_documenter::llm::TextGenerator;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub mod test_helpers {
    use super::*;

    /// A response with all five sections and the markers each one needs
    pub const COMPLETE_RESPONSE: &str = "\
# Demo documentation

## Getting Started Guide
Install Python 3 and run `python main.py`.

## Data Models Documentation
There is no data model; the script prints a string.

## Flow Charts
```mermaid
flowchart LR
    start --> print
```

## Architecture Overview
A single component: `main.py`.

## FAQs
Q: What does it print?
A: hi
";

    /// Generator returning a canned answer and counting calls
    #[derive(Clone)]
    pub struct StubGenerator {
        response: std::result::Result<String, String>,
        pub calls: Arc<AtomicUsize>,
        pub last_prompt: Arc<std::sync::Mutex<Option<String>>>,
    }

    impl StubGenerator {
        pub fn answering(response: &str) -> Self {
            Self {
                response: Ok(response.to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
                last_prompt: Arc::new(std::sync::Mutex::new(None)),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                ..Self::answering("")
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.last_prompt.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, prompt: &str, _system: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            self.response
                .clone()
                .map_err(DocumenterError::LLM)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    pub fn create_test_config(output_dir: &Path) -> Config {
        let mut config = Config::new(output_dir.to_path_buf());
        config.delay_between_repos_ms = 0;
        config.log_file = None;
        config.use_gh_cli = Some(false);
        config
    }

    /// Writes the sample repository used by the end-to-end tests
    pub fn create_demo_repository(root: &Path, name: &str) -> PathBuf {
        let repo = root.join(name);
        fs::create_dir_all(&repo).unwrap();
        fs::write(repo.join("README.md"), "# Demo").unwrap();
        fs::write(repo.join("main.py"), "print('hi')").unwrap();
        repo
    }

    pub fn setup_test_logger() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }
}
