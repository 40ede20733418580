use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"^#{1,6}\s+(.+)$").unwrap();
}

/// One of the five fixed documentation sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentationSection {
    /// Directory name below `docs/`
    pub key: &'static str,
    /// Heading text the model is asked to use
    pub title: &'static str,
    /// Markers of which at least one must appear in an accepted body
    pub markers: &'static [&'static str],
    /// Checklist rendered into the placeholder
    pub required_elements: &'static [&'static str],
}

impl DocumentationSection {
    /// Checks whether `body` mentions at least one marker, ignoring case
    pub fn accepts(&self, body: &str) -> bool {
        let body = body.to_lowercase();
        self.markers
            .iter()
            .any(|marker| body.contains(&marker.to_lowercase()))
    }
}

/// The sections in the order the model is asked to produce them
pub static SECTIONS: [DocumentationSection; 5] = [
    DocumentationSection {
        key: "getting-started",
        title: "Getting Started Guide",
        markers: &["install", "setup", "prerequisite", "usage", "getting started"],
        required_elements: &[
            "Prerequisites and system requirements",
            "Installation instructions",
            "Configuration and environment setup",
            "Basic usage examples",
            "Development setup",
        ],
    },
    DocumentationSection {
        key: "data-models",
        title: "Data Models Documentation",
        markers: &["model", "schema", "interface", "type", "struct", "entity"],
        required_elements: &[
            "Data structures and models",
            "Database schemas",
            "API request/response models",
            "Validation rules",
            "Entity relationships",
        ],
    },
    DocumentationSection {
        key: "flows",
        title: "Flow Charts",
        markers: &["```mermaid"],
        required_elements: &[
            "Application workflow diagram",
            "Request/response flow",
            "Data processing pipeline",
            "Error handling flow",
        ],
    },
    DocumentationSection {
        key: "architecture",
        title: "Architecture Overview",
        markers: &["architecture", "component", "```mermaid"],
        required_elements: &[
            "System architecture diagram",
            "Component breakdown",
            "Design patterns",
            "Integration points",
            "Deployment architecture",
        ],
    },
    DocumentationSection {
        key: "faqs",
        title: "FAQs",
        markers: &["?", "q:", "question"],
        required_elements: &[
            "Common development questions",
            "Troubleshooting guide",
            "Known issues and workarounds",
        ],
    },
];

/// Returns the heading text of a Markdown heading line, without closing `#`s
pub fn heading_text(line: &str) -> Option<&str> {
    let captures = HEADING.captures(line.trim_end())?;
    let text = captures.get(1)?.as_str().trim();
    let text = text.trim_end_matches('#').trim_end();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Index of the section whose title equals `text` exactly
pub fn section_index(text: &str) -> Option<usize> {
    SECTIONS.iter().position(|section| section.title == text)
}

/// Line-oriented state machine that splits a response into sections.
///
/// The state is the section currently being captured. A heading for a section
/// that has not been captured yet opens it, whatever its position, so sections
/// may arrive in any order. A repeated heading never reopens a section: it
/// stays in the body, or ends the body when it names a later section.
#[derive(Debug, Default)]
pub struct SectionScanner {
    current: Option<usize>,
    bodies: [Option<Vec<String>>; 5],
}

impl SectionScanner {
    /// Creates a scanner positioned before the first section
    pub fn new() -> Self {
        Self::default()
    }

    /// Section currently being captured
    pub fn current(&self) -> Option<&'static DocumentationSection> {
        self.current.map(|index| &SECTIONS[index])
    }

    /// Feeds one line of the response
    pub fn feed(&mut self, line: &str) {
        if let Some(next) = heading_text(line).and_then(section_index) {
            if self.bodies[next].is_none() {
                self.current = Some(next);
                self.bodies[next] = Some(Vec::new());
                return;
            }
            if self.current.map_or(false, |current| next > current) {
                self.current = None;
                return;
            }
        }

        if let Some(current) = self.current {
            if let Some(body) = self.bodies[current].as_mut() {
                body.push(line.to_string());
            }
        }
    }

    /// Consumes the scanner, returning trimmed bodies in section order
    pub fn finish(self) -> [Option<String>; 5] {
        self.bodies
            .map(|body| body.map(|lines| lines.join("\n").trim().to_string()))
    }
}

/// Splits `text` into the five section bodies; `None` where a heading was never found
pub fn extract_sections(text: &str) -> [Option<String>; 5] {
    let mut scanner = SectionScanner::new();
    for line in text.lines() {
        scanner.feed(line);
    }
    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("## Flow Charts", Some("Flow Charts"))]
    #[test_case("# FAQs #", Some("FAQs") ; "closing hashes")]
    #[test_case("###### Architecture Overview   ", Some("Architecture Overview"))]
    #[test_case("####### Too Deep", None)]
    #[test_case("##NoSpace", None)]
    #[test_case("Plain text", None)]
    #[test_case("## ", None ; "empty heading")]
    fn test_heading_text(line: &str, expected: Option<&str>) {
        assert_eq!(heading_text(line), expected);
    }

    #[test]
    fn test_titles_match_case_sensitively() {
        assert_eq!(section_index("FAQs"), Some(4));
        assert_eq!(section_index("faqs"), None);
        assert_eq!(section_index("1. Getting Started Guide"), None);
    }

    #[test]
    fn test_bodies_stop_at_next_section() {
        let text = "preamble\n## Getting Started Guide\nInstall it.\n## Data Models Documentation\nA model.\n";
        let sections = extract_sections(text);

        assert_eq!(sections[0].as_deref(), Some("Install it."));
        assert_eq!(sections[1].as_deref(), Some("A model."));
        assert_eq!(sections[2], None);
    }

    #[test]
    fn test_repeated_earlier_heading_stays_in_body() {
        let text = "## Getting Started Guide\nInstall it.\n## Flow Charts\nsee below\n## Getting Started Guide\nnot a new section\n## FAQs\nQ: ok?";
        let sections = extract_sections(text);

        assert_eq!(sections[0].as_deref(), Some("Install it."));
        assert_eq!(
            sections[2].as_deref(),
            Some("see below\n## Getting Started Guide\nnot a new section")
        );
        assert_eq!(sections[4].as_deref(), Some("Q: ok?"));
    }

    #[test]
    fn test_out_of_order_sections_are_extracted() {
        let text = "## Getting Started Guide\nInstall it.\n## Flow Charts\n```mermaid\ngraph TD\n```\n## Data Models Documentation\nThe User model.\n## Architecture Overview\nOne component.\n## FAQs\nQ: why?";
        let sections = extract_sections(text);

        assert_eq!(sections[1].as_deref(), Some("The User model."));
        assert_eq!(sections[2].as_deref(), Some("```mermaid\ngraph TD\n```"));
        assert_eq!(sections[3].as_deref(), Some("One component."));
        assert!(sections.iter().all(Option::is_some));
    }

    #[test]
    fn test_repeated_later_heading_ends_body() {
        let text = "## Flow Charts\nfirst\n## Data Models Documentation\nA model.\n## Flow Charts\nsecond";
        let sections = extract_sections(text);

        assert_eq!(sections[1].as_deref(), Some("A model."));
        assert_eq!(sections[2].as_deref(), Some("first"));
    }

    #[test]
    fn test_scanner_tracks_current_section() {
        let mut scanner = SectionScanner::new();
        assert!(scanner.current().is_none());
        scanner.feed("ignored");
        scanner.feed("### Architecture Overview");
        assert_eq!(scanner.current().map(|s| s.key), Some("architecture"));
        scanner.feed("## Data Models Documentation");
        assert_eq!(scanner.current().map(|s| s.key), Some("data-models"));
        scanner.feed("## Data Models Documentation");
        assert_eq!(scanner.current().map(|s| s.key), Some("data-models"));
    }

    #[test_case(0, "Run npm install first", true)]
    #[test_case(1, "The User STRUCT holds...", true)]
    #[test_case(2, "graph TD; A-->B", false ; "diagram needs fence")]
    #[test_case(2, "```mermaid\ngraph TD\n```", true)]
    #[test_case(3, "Nothing relevant here", false)]
    #[test_case(4, "How do I deploy?", true)]
    fn test_marker_validation(index: usize, body: &str, accepted: bool) {
        assert_eq!(SECTIONS[index].accepts(body), accepted);
    }
}
