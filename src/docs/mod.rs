//! Section extraction and the `docs/` tree written for each repository.

/// Section catalogue and extraction
pub mod sections;
/// Writing the `docs/` tree
pub mod writer;

pub use sections::{extract_sections, DocumentationSection, SectionScanner, SECTIONS};
pub use writer::{
    create_documentation_structure, save_documentation, write_documentation, DocsLayout,
    PlaceholderReason, SectionOutcome, SectionStatus,
};
