use crate::analysis::SampledFile;

/// Reported when no source file maps to a known technology
pub const UNKNOWN_TECHNOLOGY: &str = "Unknown";

/// Maps a source file extension to its technology name
pub fn technology_for_extension(ext: &str) -> Option<&'static str> {
    let technology = match ext.to_lowercase().as_str() {
        "py" => "Python",
        "js" | "jsx" => "JavaScript",
        "ts" | "tsx" => "TypeScript",
        "java" => "Java",
        "go" => "Go",
        "rb" => "Ruby",
        "php" => "PHP",
        "cs" => "C#",
        "rs" => "Rust",
        "kt" => "Kotlin",
        "swift" => "Swift",
        "scala" => "Scala",
        _ => return None,
    };
    Some(technology)
}

/// Returns the technology with the most source files.
///
/// Counts are kept in first-seen order and ties go to the technology seen
/// first; files with unmapped extensions are not counted.
pub fn detect_main_technology(source_files: &[&SampledFile]) -> String {
    let mut tally: Vec<(&'static str, usize)> = Vec::new();

    for file in source_files {
        let technology = file
            .relative_path
            .rsplit_once('.')
            .and_then(|(_, ext)| technology_for_extension(ext));
        let Some(technology) = technology else {
            continue;
        };
        match tally.iter_mut().find(|(name, _)| *name == technology) {
            Some((_, count)) => *count += 1,
            None => tally.push((technology, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (name, count) in tally {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((name, count));
        }
    }

    best.map(|(name, _)| name.to_string())
        .unwrap_or_else(|| UNKNOWN_TECHNOLOGY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn detect(paths: &[&str]) -> String {
        let files: Vec<SampledFile> = paths.iter().map(|p| SampledFile::new(p, "")).collect();
        let refs: Vec<&SampledFile> = files.iter().collect();
        detect_main_technology(&refs)
    }

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(detect(&[]), UNKNOWN_TECHNOLOGY);
    }

    #[test]
    fn test_unmapped_extensions_are_ignored() {
        assert_eq!(detect(&["a.c", "b.cpp", "c.vue"]), UNKNOWN_TECHNOLOGY);
        assert_eq!(detect(&["a.c", "b.c", "main.go"]), "Go");
    }

    #[test]
    fn test_jsx_and_js_share_a_count() {
        assert_eq!(detect(&["a.ts", "b.js", "c.jsx", "d.tsx", "e.jsx"]), "JavaScript");
    }

    #[test_case(&["a.rb", "b.py"], "Ruby" ; "first seen wins tie")]
    #[test_case(&["b.py", "a.rb"], "Python" ; "order matters")]
    #[test_case(&["a.rb", "b.py", "c.py"], "Python" ; "strict majority")]
    fn test_ties_break_by_insertion_order(paths: &[&str], expected: &str) {
        assert_eq!(detect(paths), expected);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let paths = ["x.java", "y.cs", "z.java", "w.cs"];
        let first = detect(&paths);
        for _ in 0..10 {
            assert_eq!(detect(&paths), first);
        }
        assert_eq!(first, "Java");
    }
}
