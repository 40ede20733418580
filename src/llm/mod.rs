//! Text generation: the service abstraction and the call that turns a
//! documentation request into Markdown, whatever happens.

/// Anthropic Messages API client
pub mod anthropic;

use crate::error::Result;
use crate::prompts::DocumentationRequest;
use async_trait::async_trait;
use log::{error, info};

pub use anthropic::AnthropicClient;

/// First line of the document produced when generation fails
pub const FAILURE_HEADING: &str = "# Documentation Generation Failed";

/// A service that completes a prompt under a system instruction
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates text for `prompt`
    async fn generate(&self, prompt: &str, system: &str) -> Result<String>;

    /// Name used in log messages
    fn name(&self) -> &str;
}

/// Renders the document written when generation fails
pub fn failure_document(message: &str) -> String {
    format!("{}\n\nError: {}", FAILURE_HEADING, message)
}

/// Runs one generation call.
///
/// Never fails: errors are logged and turned into a failure document, which
/// the section writer later replaces with placeholders.
pub async fn generate_documentation(
    generator: &dyn TextGenerator,
    request: &DocumentationRequest,
) -> String {
    info!("Requesting documentation from {}", generator.name());
    match generator.generate(&request.prompt, &request.system).await {
        Ok(text) => {
            info!("Received {} characters of documentation", text.chars().count());
            text
        }
        Err(e) => {
            error!("Documentation generation failed: {}", e);
            failure_document(&e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumenterError;
    use mockall::predicate::eq;

    fn request() -> DocumentationRequest {
        DocumentationRequest {
            prompt: "document this".to_string(),
            system: "be thorough".to_string(),
        }
    }

    #[tokio::test]
    async fn test_successful_generation_is_returned_verbatim() {
        let mut generator = MockTextGenerator::new();
        generator.expect_name().return_const("mock".to_string());
        generator
            .expect_generate()
            .with(eq("document this"), eq("be thorough"))
            .times(1)
            .returning(|_, _| Ok("## Getting Started Guide\nRun it.".to_string()));

        let text = generate_documentation(&generator, &request()).await;
        assert_eq!(text, "## Getting Started Guide\nRun it.");
    }

    #[tokio::test]
    async fn test_errors_become_failure_document() {
        let mut generator = MockTextGenerator::new();
        generator.expect_name().return_const("mock".to_string());
        generator
            .expect_generate()
            .times(1)
            .returning(|_, _| Err(DocumenterError::LLM("overloaded".to_string())));

        let text = generate_documentation(&generator, &request()).await;
        assert_eq!(text, "# Documentation Generation Failed\n\nError: LLM error: overloaded");
    }
}
