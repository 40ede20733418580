//! Repository analysis: sampling the working tree, classifying files and
//! summarising the project structure.

/// Working tree traversal and file classification
pub mod sampler;
/// Main technology detection
pub mod technology;

use serde::Serialize;

pub use sampler::{classify, FileSampler};
pub use technology::{detect_main_technology, technology_for_extension, UNKNOWN_TECHNOLOGY};

/// Rendered in place of a missing README
pub const NO_README: &str = "No README found";

/// Category assigned to every sampled file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileCategory {
    /// Language source file
    Source,
    /// Build, dependency or runtime configuration
    Config,
    /// README file
    Readme,
    /// Readable text that fits none of the above
    Other,
}

/// A text file read from the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampledFile {
    /// Path relative to the repository root, `/`-separated
    pub relative_path: String,
    /// Full file content
    pub content: String,
    /// Classification
    pub category: FileCategory,
}

impl SampledFile {
    /// Creates a sampled file, classifying it from its path
    pub fn new(relative_path: &str, content: &str) -> Self {
        Self {
            relative_path: relative_path.to_string(),
            content: content.to_string(),
            category: classify(relative_path),
        }
    }
}

/// Read-only summary derived once from the sampled files
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectStructure {
    /// Every sampled file, whatever its category
    pub total_files: usize,
    /// Source files
    pub source_files: usize,
    /// Configuration files
    pub config_files: usize,
    /// README files
    pub readme_files: usize,
    /// A configuration path ends with `Dockerfile`
    pub has_docker: bool,
    /// A source path mentions `test`
    pub has_tests: bool,
    /// A README path mentions `docs`
    pub has_existing_docs: bool,
    /// Dominant technology of the source files
    pub main_technology: String,
}

impl ProjectStructure {
    /// Computes the summary for a set of sampled files
    pub fn from_files(files: &[SampledFile]) -> Self {
        let of = |category: FileCategory| files.iter().filter(move |f| f.category == category);

        let sources: Vec<&SampledFile> = of(FileCategory::Source).collect();

        Self {
            total_files: files.len(),
            source_files: sources.len(),
            config_files: of(FileCategory::Config).count(),
            readme_files: of(FileCategory::Readme).count(),
            has_docker: of(FileCategory::Config).any(|f| f.relative_path.ends_with("Dockerfile")),
            has_tests: sources.iter().any(|f| f.relative_path.to_lowercase().contains("test")),
            has_existing_docs: of(FileCategory::Readme)
                .any(|f| f.relative_path.to_lowercase().contains("docs")),
            main_technology: detect_main_technology(&sources),
        }
    }
}

/// Everything known about one repository's contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryAnalysis {
    /// Sampled files in traversal order
    pub files: Vec<SampledFile>,
    /// The README chosen to represent the project
    pub main_readme: Option<SampledFile>,
    /// Derived summary
    pub structure: ProjectStructure,
}

impl RepositoryAnalysis {
    /// Builds the analysis from files given in traversal order
    pub fn from_files(files: Vec<SampledFile>) -> Self {
        let main_readme = files
            .iter()
            .find(|f| f.category == FileCategory::Readme && f.relative_path == "README.md")
            .or_else(|| files.iter().find(|f| f.category == FileCategory::Readme))
            .cloned();
        let structure = ProjectStructure::from_files(&files);

        Self {
            files,
            main_readme,
            structure,
        }
    }

    fn by_category(&self, category: FileCategory) -> impl Iterator<Item = &SampledFile> {
        self.files.iter().filter(move |f| f.category == category)
    }

    /// Source files in traversal order
    pub fn source_files(&self) -> impl Iterator<Item = &SampledFile> {
        self.by_category(FileCategory::Source)
    }

    /// Configuration files in traversal order
    pub fn config_files(&self) -> impl Iterator<Item = &SampledFile> {
        self.by_category(FileCategory::Config)
    }

    /// README files in traversal order
    pub fn readme_files(&self) -> impl Iterator<Item = &SampledFile> {
        self.by_category(FileCategory::Readme)
    }

    /// Content of the main README, or [`NO_README`]
    pub fn readme_content(&self) -> &str {
        self.main_readme
            .as_ref()
            .map(|f| f.content.as_str())
            .unwrap_or(NO_README)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn root_readme_wins_over_earlier_readmes() {
        let analysis = RepositoryAnalysis::from_files(vec![
            SampledFile::new("docs/README.md", "# Docs"),
            SampledFile::new("README.md", "# Root"),
        ]);

        assert_eq!(analysis.readme_content(), "# Root");
        assert!(analysis.structure.has_existing_docs);
    }

    #[test]
    fn first_readme_is_used_without_root_readme() {
        let analysis = RepositoryAnalysis::from_files(vec![
            SampledFile::new("pkg/readme.txt", "pkg"),
            SampledFile::new("web/README.md", "web"),
        ]);

        assert_eq!(analysis.readme_content(), "pkg");
    }

    #[test]
    fn missing_readme_renders_sentinel() {
        let analysis = RepositoryAnalysis::from_files(vec![SampledFile::new("main.go", "package main")]);
        assert_eq!(analysis.main_readme, None);
        assert_eq!(analysis.readme_content(), NO_README);
    }

    #[test]
    fn structure_flags_and_counts() {
        let structure = ProjectStructure::from_files(&[
            SampledFile::new("app/main.py", ""),
            SampledFile::new("tests/Test_main.py", ""),
            SampledFile::new("deploy/Dockerfile", ""),
            SampledFile::new("package.json", "{}"),
            SampledFile::new("README.md", "# Demo"),
            SampledFile::new("LICENSE", "MIT"),
        ]);

        assert_eq!(
            structure,
            ProjectStructure {
                total_files: 6,
                source_files: 2,
                config_files: 2,
                readme_files: 1,
                has_docker: true,
                has_tests: true,
                has_existing_docs: false,
                main_technology: "Python".to_string(),
            }
        );
    }

    #[test]
    fn test_flag_only_considers_source_paths() {
        let structure = ProjectStructure::from_files(&[
            SampledFile::new("src/lib.rs", ""),
            SampledFile::new("test-config.yml", ""),
        ]);
        assert!(!structure.has_tests);
    }
}
