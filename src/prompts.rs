//! Prompt construction for documentation generation. Pure string assembly:
//! no I/O happens here.

use crate::analysis::RepositoryAnalysis;
use std::fmt::Write as _;

/// Characters kept from each key source file
pub const SOURCE_EXCERPT_CHARS: usize = 3000;
/// Characters kept from each configuration file
pub const CONFIG_EXCERPT_CHARS: usize = 1500;

/// Path fragments that mark a source file as worth quoting
pub const INTEREST_KEYWORDS: &[&str] = &[
    "main", "index", "app", "server", "config", "model", "type", "interface", "service",
];

/// System prompt sent with every generation request
pub const SYSTEM_INSTRUCTION: &str = r#"You are a technical documentation expert. Your task is to analyze repository files and create comprehensive documentation. Follow these guidelines:

1. Be specific and detailed in your explanations
2. Use real code examples from the repository
3. Create proper Mermaid diagrams that accurately represent the system
4. Focus on practical, actionable information
5. Include security and performance best practices
6. Write in a clear, professional style
7. Structure documentation with proper headings and sections
8. Include code snippets and configuration examples
9. Add troubleshooting guides and common issues
10. Ensure all documentation is accurate based on the code

Format your response as a complete Markdown document with all sections properly formatted."#;

/// Section requirements appended to every prompt
pub const DOCUMENTATION_REQUIREMENTS: &str = r#"
## Required Documentation Sections

Please create comprehensive documentation with the following sections. Each section should be detailed and include real examples from the code:

1. ## Getting Started Guide

Create a practical guide that includes:
- Prerequisites and system requirements (based on package.json, requirements.txt, etc.)
- Step-by-step installation instructions
- Configuration setup with real examples
- Environment variables setup
- Basic usage examples using real code from the repository
- Development setup instructions
- Common issues and solutions

2. ## Data Models Documentation

Document all data structures including:
- Database schemas and models
- TypeScript/JavaScript interfaces and types
- API request/response models
- Data validation rules
- Example data structures
- Entity relationships (with Mermaid ER diagrams)
- Data flow between components

3. ## Flow Charts

Create detailed diagrams using Mermaid syntax for:
- Application workflow
- Request/response flow
- Data processing pipelines
- State management
- Component interactions
- Authentication/authorization flow
- Error handling flow

Example Mermaid diagram:
```mermaid
sequenceDiagram
    participant Client
    participant API
    participant Database
    Client->>API: Request
    API->>Database: Query
    Database-->>API: Response
    API-->>Client: Result
```

4. ## Architecture Overview

Provide a comprehensive overview including:
- System architecture (with Mermaid diagram)
- Component breakdown
- Design patterns used
- Security measures
- Performance optimizations
- Integration points
- Deployment architecture
- Scalability considerations
- Error handling strategy

5. ## FAQs

Create a practical FAQ section covering:
- Common development questions
- Troubleshooting guide
- Best practices
- Performance tips
- Security guidelines
- Known issues and workarounds
- Deployment considerations
- Maintenance procedures

Format your response as a complete Markdown document. Use proper headings, code blocks, and Mermaid diagrams. Focus on practical, actionable information that will help developers understand and work with the codebase.

Each section must start with a level-2 heading whose text is exactly the section name shown above (for example `## Flow Charts`), without numbering.

## Important Notes

1. Use actual code examples from the repository
2. Create accurate Mermaid diagrams based on the code structure
3. Include security and performance considerations
4. Add troubleshooting guides for common issues
5. Make the documentation practical and actionable
6. Structure the content with clear headings
7. Include configuration examples
8. Add code snippets for common tasks
9. Reference actual file paths and components
10. Explain architectural decisions and trade-offs

Begin your response with the Getting Started Guide section.
"#;

/// Prompt and system instruction for one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationRequest {
    /// User prompt
    pub prompt: String,
    /// System instruction
    pub system: String,
}

impl DocumentationRequest {
    /// Builds the request for a repository
    pub fn new(repo_name: &str, analysis: &RepositoryAnalysis) -> Self {
        Self {
            prompt: build_prompt(repo_name, analysis),
            system: SYSTEM_INSTRUCTION.to_string(),
        }
    }
}

/// Keeps the first `max_chars` characters, appending `...` only when something was cut
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn is_interesting(path: &str) -> bool {
    let path = path.to_lowercase();
    INTEREST_KEYWORDS.iter().any(|keyword| path.contains(keyword))
}

/// Assembles the documentation prompt for a repository
pub fn build_prompt(repo_name: &str, analysis: &RepositoryAnalysis) -> String {
    let structure = &analysis.structure;
    let mut prompt = String::new();

    // Writing into a String cannot fail
    let _ = write!(
        prompt,
        r#"
# Repository Documentation Task: {name}

## Project Overview

Repository Name: {name}
Main Technology: {tech}
Total Files: {total}
Source Files: {sources}
Configuration Files: {configs}
Has Docker: {docker}
Has Tests: {tests}
Has Existing Docs: {docs}

## Current README Content

{readme}

## Repository Structure

### Source Files:
{source_list}

### Config Files:
{config_list}

## Key Source Files Content

"#,
        name = repo_name,
        tech = structure.main_technology,
        total = structure.total_files,
        sources = structure.source_files,
        configs = structure.config_files,
        docker = yes_no(structure.has_docker),
        tests = yes_no(structure.has_tests),
        docs = yes_no(structure.has_existing_docs),
        readme = analysis.readme_content(),
        source_list = path_list(analysis.source_files().map(|f| f.relative_path.as_str())),
        config_list = path_list(analysis.config_files().map(|f| f.relative_path.as_str())),
    );

    for file in analysis.source_files().filter(|f| is_interesting(&f.relative_path)) {
        let _ = write!(
            prompt,
            "\n### {}\n```\n{}\n```\n",
            file.relative_path,
            truncate_with_ellipsis(&file.content, SOURCE_EXCERPT_CHARS)
        );
    }

    prompt.push_str("\n## Configuration Files\n");
    for file in analysis.config_files() {
        let _ = write!(
            prompt,
            "\n### {}\n```\n{}\n```\n",
            file.relative_path,
            truncate_with_ellipsis(&file.content, CONFIG_EXCERPT_CHARS)
        );
    }

    prompt.push_str(DOCUMENTATION_REQUIREMENTS);
    prompt
}

fn path_list<'a>(paths: impl Iterator<Item = &'a str>) -> String {
    paths.map(|p| format!("- {}", p)).collect::<Vec<_>>().join("\n")
}
