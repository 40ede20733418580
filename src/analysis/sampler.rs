use crate::analysis::{FileCategory, RepositoryAnalysis, SampledFile};
use crate::config::Config;
use crate::docs::writer::SECTION_FILE;
use crate::docs::SECTIONS;
use crate::error::Result;
use log::{debug, info, warn};
use regex::Regex;
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Files above this size are not sampled
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_000_000;

const SOURCE_EXTENSIONS: &[&str] = &[
    "py", "js", "jsx", "ts", "tsx", "java", "go", "rb", "php", "cs",
    "rs", "kt", "swift", "scala", "c", "cc", "cpp", "h", "hpp", "m",
    "vue", "svelte",
];

const CONFIG_EXTENSIONS: &[&str] = &[
    "json", "yml", "yaml", "toml", "ini", "cfg", "conf", "xml",
    "properties", "gradle", "env",
];

const CONFIG_FILE_NAMES: &[&str] = &[
    "Dockerfile", "Makefile", "Gemfile", "Pipfile", "Procfile",
    "requirements.txt", "go.mod", "go.sum", "Cargo.lock",
    ".env.example", ".gitignore", ".dockerignore", ".editorconfig",
];

const README_FILE_NAMES: &[&str] = &[
    "readme.md", "readme", "readme.txt", "readme.rst", "readme.markdown",
];

/// Classifies a repository-relative path.
///
/// Source extensions win over configuration names/extensions, which win over
/// README names; everything else is [`FileCategory::Other`].
pub fn classify(relative_path: &str) -> FileCategory {
    let file_name = relative_path.rsplit('/').next().unwrap_or(relative_path);
    let extension = file_name
        .rsplit_once('.')
        .filter(|(stem, _)| !stem.is_empty())
        .map(|(_, ext)| ext.to_lowercase());

    if let Some(ext) = extension.as_deref() {
        if SOURCE_EXTENSIONS.contains(&ext) {
            return FileCategory::Source;
        }
    }

    let is_config = CONFIG_FILE_NAMES.contains(&file_name)
        || file_name.starts_with("Dockerfile.")
        || file_name.to_lowercase().ends_with(".dockerfile")
        || extension.as_deref().map_or(false, |ext| CONFIG_EXTENSIONS.contains(&ext));
    if is_config {
        return FileCategory::Config;
    }

    if README_FILE_NAMES.contains(&file_name.to_lowercase().as_str()) {
        return FileCategory::Readme;
    }

    FileCategory::Other
}

/// Walks a working tree and collects the readable text files
#[derive(Debug, Clone)]
pub struct FileSampler {
    max_file_size: u64,
    excluded: Vec<Regex>,
}

impl Default for FileSampler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE, Vec::new())
    }
}

impl FileSampler {
    /// Creates a sampler with a size ceiling and exclusion patterns
    pub fn new(max_file_size: u64, excluded: Vec<Regex>) -> Self {
        Self {
            max_file_size,
            excluded,
        }
    }

    /// Creates a sampler from the sampling section and exclusion patterns of the config
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.sampling.max_file_size, config.exclusion_patterns()?))
    }

    /// Samples every readable text file below `root`.
    ///
    /// Dot-directories at any depth are skipped, as are paths matching an
    /// exclusion pattern and the generated `docs/` files. Oversized, binary, non-UTF-8 and unreadable files are
    /// left out entirely. Never fails: problems with single entries are logged
    /// and the walk continues.
    pub fn analyze(&self, root: &Path) -> RepositoryAnalysis {
        info!("Analyzing repository structure at {}", root.display());
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter()
            .filter_entry(|entry| !self.should_skip(root, entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                    warn!("Skipping {}: {}", path, e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let relative_path = relative_path(root, entry.path());
            if is_generated_output(&relative_path) {
                debug!("Skipping generated {}", relative_path);
                continue;
            }
            if let Some(content) = self.read_text(entry.path(), &relative_path) {
                files.push(SampledFile::new(&relative_path, &content));
            }
        }

        let analysis = RepositoryAnalysis::from_files(files);
        info!(
            "Sampled {} files ({} source, {} config, main technology: {})",
            analysis.structure.total_files,
            analysis.structure.source_files,
            analysis.structure.config_files,
            analysis.structure.main_technology
        );
        analysis
    }

    fn should_skip(&self, root: &Path, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        let is_dir = entry.file_type().is_dir();
        if is_dir && entry.file_name().to_string_lossy().starts_with('.') {
            return true;
        }

        let mut path = relative_path(root, entry.path());
        if is_dir {
            path.push('/');
        }
        self.excluded.iter().any(|pattern| pattern.is_match(&path))
    }

    fn read_text(&self, path: &Path, relative_path: &str) -> Option<String> {
        match fs::metadata(path) {
            Ok(metadata) if metadata.len() > self.max_file_size => {
                debug!("Skipping {} ({} bytes, too large)", relative_path, metadata.len());
                return None;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Could not read file {}: {}", relative_path, e);
                return None;
            }
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Could not read file {}: {}", relative_path, e);
                return None;
            }
        };

        if content_inspector::inspect(&bytes).is_binary() {
            debug!("Skipping binary file {}", relative_path);
            return None;
        }

        match String::from_utf8(bytes) {
            Ok(content) => Some(content),
            Err(_) => {
                debug!("Skipping non UTF-8 file {}", relative_path);
                None
            }
        }
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use tempfile::TempDir;
    use test_case::test_case;

    fn write(root: &Path, path: &str, content: &[u8]) {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn paths(analysis: &RepositoryAnalysis) -> Vec<&str> {
        analysis.files.iter().map(|f| f.relative_path.as_str()).collect()
    }

    #[test_case("src/main.py", FileCategory::Source)]
    #[test_case("web/App.TSX", FileCategory::Source)]
    #[test_case("setup.py", FileCategory::Source ; "source beats config")]
    #[test_case("package.json", FileCategory::Config)]
    #[test_case("Dockerfile", FileCategory::Config)]
    #[test_case("docker/Dockerfile.dev", FileCategory::Config)]
    #[test_case("requirements.txt", FileCategory::Config)]
    #[test_case("README.md", FileCategory::Readme)]
    #[test_case("docs/Readme", FileCategory::Readme)]
    #[test_case("readme.json", FileCategory::Config ; "config beats readme")]
    #[test_case("LICENSE", FileCategory::Other)]
    #[test_case("notes.txt", FileCategory::Other)]
    #[test_case(".py", FileCategory::Other ; "dotfile without stem")]
    fn test_classify(path: &str, expected: FileCategory) {
        assert_eq!(classify(path), expected);
    }

    #[test]
    fn test_hidden_directories_skipped_at_any_depth() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, ".git/config", b"[core]");
        write(root, "src/.cache/data.json", b"{}");
        write(root, ".github/workflows/ci.yml", b"on: push");
        write(root, ".env.example", b"TOKEN=");
        write(root, "src/app.py", b"print('app')");

        let analysis = FileSampler::default().analyze(root);

        assert_eq!(paths(&analysis), vec![".env.example", "src/app.py"]);
    }

    #[test]
    fn test_oversized_binary_and_invalid_files_are_excluded() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "big.py", &vec![b'a'; 64]);
        write(root, "logo.png", &[0x89, b'P', b'N', b'G', 0x00, 0x00, 0x1a]);
        write(root, "latin1.txt", &[b'c', b'a', b'f', 0xe9]);
        write(root, "ok.py", b"x = 1");

        let analysis = FileSampler::new(32, Vec::new()).analyze(root);

        assert_eq!(paths(&analysis), vec!["ok.py"]);
        assert_eq!(analysis.structure.total_files, 1);
    }

    #[test]
    fn test_exclusion_patterns_prune_directories() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "node_modules/left-pad/index.js", b"module.exports = 1");
        write(root, "web/node_modules/react/index.js", b"module.exports = 2");
        write(root, "web/index.js", b"console.log(1)");

        let analysis = FileSampler::from_config(&Config::default()).unwrap().analyze(root);

        assert_eq!(paths(&analysis), vec!["web/index.js"]);
    }

    #[test]
    fn test_traversal_order_is_sorted_and_relative() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "b/z.go", b"package b");
        write(root, "a.go", b"package a");
        write(root, "README.md", b"# Demo");

        let analysis = FileSampler::default().analyze(root);

        assert_eq!(paths(&analysis), vec!["README.md", "a.go", "b/z.go"]);
        assert_eq!(analysis.readme_content(), "# Demo");
        assert_eq!(analysis.structure.main_technology, "Go");
    }

    #[test_case("docs/README.md", true)]
    #[test_case("docs/flows/README.md", true)]
    #[test_case("docs/faqs/README.md", true)]
    #[test_case("docs/flows/diagram.md", false)]
    #[test_case("docs/guide/README.md", false)]
    #[test_case("api/docs/README.md", false)]
    #[test_case("README.md", false)]
    fn test_is_generated_output(path: &str, expected: bool) {
        assert_eq!(is_generated_output(path), expected);
    }

    #[test]
    fn test_generated_docs_are_not_sampled() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "README.md", b"# Demo");
        write(root, "docs/README.md", b"# Documentation");
        write(root, "docs/architecture/README.md", b"# Architecture Overview");
        write(root, "docs/notes.md", b"hand written");

        let analysis = FileSampler::default().analyze(root);

        assert_eq!(paths(&analysis), vec!["README.md", "docs/notes.md"]);
        assert!(!analysis.structure.has_existing_docs);
    }

    #[test]
    fn test_missing_root_yields_empty_analysis() {
        let analysis = FileSampler::default().analyze(Path::new("/definitely/not/a/repo"));
        assert!(analysis.files.is_empty());
        assert_eq!(analysis.structure.main_technology, "Unknown");
    }

    proptest! {
        #[test]
        fn category_depends_only_on_file_name(name in "[A-Za-z._-]{1,12}", dir in "[a-z]{1,6}(/[a-z]{1,6}){0,2}") {
            prop_assert_eq!(classify(&format!("{}/{}", dir, name)), classify(&name));
        }
    }
}
