//! Regex filtering of found files

use regex::Regex;

use crate::search::SearchError;

/// Accepts files whose path matches a regex anywhere
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    pattern: Option<Regex>,
}

impl FileFilter {
    /// Compile a filter; a missing or blank pattern accepts everything
    pub fn new(pattern: Option<&str>) -> Result<Self, SearchError> {
        let pattern = match pattern.map(str::trim) {
            Some(p) if !p.is_empty() => Some(Regex::new(p)?),
            _ => None,
        };
        Ok(Self { pattern })
    }

    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn accept(&self, path: &str) -> bool {
        self.pattern.as_ref().map_or(true, |re| re.is_match(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filter_accepts_everything() {
        let filter = FileFilter::new(None).unwrap();
        assert!(!filter.is_active());
        assert!(filter.accept("/any/file"));

        let blank = FileFilter::new(Some("  ")).unwrap();
        assert!(!blank.is_active());
    }

    #[test]
    fn test_filter_matches_whole_path() {
        let filter = FileFilter::new(Some("other")).unwrap();
        assert!(filter.accept("/some/other/path/file2"));
        assert!(!filter.accept("/some/path/file1"));

        let filter = FileFilter::new(Some(r"\.rs$")).unwrap();
        assert!(filter.accept("/src/main.rs"));
        assert!(!filter.accept("/src/main.rs.bak"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            FileFilter::new(Some("(unclosed")),
            Err(SearchError::InvalidFilter(_))
        ));
    }
}
