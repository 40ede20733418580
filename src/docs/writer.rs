use crate::docs::sections::{extract_sections, DocumentationSection, SECTIONS};
use crate::error::{DocumenterError, Result};
use log::{debug, error, info, warn};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of every Markdown file written below `docs/`
pub const SECTION_FILE: &str = "README.md";

/// Why a section was written as a placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderReason {
    /// The heading never appeared in the response
    Missing,
    /// The heading was found but the body had none of the expected markers
    Invalid,
}

/// What happened to one section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStatus {
    /// Model output was written
    Extracted,
    /// The placeholder template was written
    Placeholder(PlaceholderReason),
}

/// Result of writing one section file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionOutcome {
    /// The section
    pub section: &'static DocumentationSection,
    /// Whether model output or a placeholder was written
    pub status: SectionStatus,
    /// File that was written
    pub path: PathBuf,
}

impl SectionOutcome {
    /// True when model output was written
    pub fn is_extracted(&self) -> bool {
        self.status == SectionStatus::Extracted
    }
}

/// Paths of the documentation tree of one repository
#[derive(Debug, Clone)]
pub struct DocsLayout {
    /// The `docs/` directory
    pub docs_dir: PathBuf,
}

impl DocsLayout {
    /// Layout rooted at `<repo_path>/docs`
    pub fn for_repository(repo_path: &Path) -> Self {
        Self::new(&repo_path.join("docs"))
    }

    /// Layout rooted at an explicit docs directory
    pub fn new(docs_dir: &Path) -> Self {
        Self {
            docs_dir: docs_dir.to_path_buf(),
        }
    }

    /// The index file linking all sections
    pub fn index_file(&self) -> PathBuf {
        self.docs_dir.join(SECTION_FILE)
    }

    /// Directory of one section
    pub fn section_dir(&self, section: &DocumentationSection) -> PathBuf {
        self.docs_dir.join(section.key)
    }

    /// File of one section
    pub fn section_file(&self, section: &DocumentationSection) -> PathBuf {
        self.section_dir(section).join(SECTION_FILE)
    }

    /// Creates `docs/` and the section directories; a no-op when they exist
    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.docs_dir)?;
        for section in SECTIONS.iter() {
            fs::create_dir_all(self.section_dir(section))?;
        }
        Ok(())
    }
}

/// Creates the documentation tree of a repository and returns its `docs/` path
pub fn create_documentation_structure(repo_path: &Path) -> Result<PathBuf> {
    let layout = DocsLayout::for_repository(repo_path);
    layout.ensure_dirs_exist().map_err(|e| {
        DocumenterError::IO(std::io::Error::new(
            e.kind(),
            format!("Failed to create {}: {}", layout.docs_dir.display(), e),
        ))
    })?;
    debug!("Documentation structure ready at {}", layout.docs_dir.display());
    Ok(layout.docs_dir)
}

/// Renders the index listing every section
pub fn render_index() -> String {
    let mut index = String::from("# Documentation\n\n");
    for section in SECTIONS.iter() {
        let _ = writeln!(index, "- [{}]({}/{})", section.title, section.key, SECTION_FILE);
    }
    index
}

/// Renders the stand-in file for a section that could not be extracted
pub fn render_placeholder(section: &DocumentationSection) -> String {
    let mut placeholder = format!(
        "# {}\n\n> This section could not be generated automatically. \
         Please fill it in by hand, covering the elements below.\n\n## Required Elements\n\n",
        section.title
    );
    for element in section.required_elements {
        let _ = writeln!(placeholder, "- [ ] {}", element);
    }
    placeholder
}

/// Renders an accepted section body
pub fn render_section(section: &DocumentationSection, body: &str) -> String {
    if body.starts_with("# ") {
        format!("{}\n", body)
    } else {
        format!("# {}\n\n{}\n", section.title, body)
    }
}

/// Writes the index and all five section files below `docs_dir`.
///
/// Every file is rewritten on each call, so repeated runs leave exactly the
/// same set of files behind.
pub fn write_documentation(docs_dir: &Path, text: &str) -> Result<Vec<SectionOutcome>> {
    let layout = DocsLayout::new(docs_dir);
    layout.ensure_dirs_exist()?;

    fs::write(layout.index_file(), render_index())?;

    let bodies = extract_sections(text);
    let mut outcomes = Vec::with_capacity(SECTIONS.len());

    for (section, body) in SECTIONS.iter().zip(bodies) {
        let (content, status) = match body {
            Some(body) if section.accepts(&body) => {
                (render_section(section, &body), SectionStatus::Extracted)
            }
            Some(_) => {
                warn!("Section '{}' lacks expected content, writing placeholder", section.title);
                (
                    render_placeholder(section),
                    SectionStatus::Placeholder(PlaceholderReason::Invalid),
                )
            }
            None => {
                warn!("Section '{}' not found in response, writing placeholder", section.title);
                (
                    render_placeholder(section),
                    SectionStatus::Placeholder(PlaceholderReason::Missing),
                )
            }
        };

        let path = layout.section_file(section);
        fs::write(&path, content)?;
        outcomes.push(SectionOutcome {
            section,
            status,
            path,
        });
    }

    Ok(outcomes)
}

/// Writes the documentation, reporting failure as `false` instead of an error
pub fn save_documentation(docs_dir: &Path, text: &str) -> bool {
    match write_documentation(docs_dir, text) {
        Ok(outcomes) => {
            let extracted = outcomes.iter().filter(|o| o.is_extracted()).count();
            info!(
                "Documentation saved to {} ({} of {} sections extracted)",
                docs_dir.display(),
                extracted,
                outcomes.len()
            );
            true
        }
        Err(e) => {
            error!("Error saving documentation to {}: {}", docs_dir.display(), e);
            false
        }
    }
}
