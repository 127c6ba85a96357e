//! History readers
//!
//! Shell history and the recent directory log are append-only files, so the
//! newest entry is the last line. Both readers hand their entries out
//! newest-first.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::core::paths::sanitize_dir;
use crate::search::session::HistoryLines;

/// Read a history file, newest line first
///
/// Only the last `max_scanned` lines are returned when a limit is given.
/// Invalid UTF-8 is replaced rather than rejected; shells happily record it.
pub fn read_history_lines(path: &Path, max_scanned: Option<usize>) -> Result<HistoryLines> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read history file: {:?}", path))?;
    let content = String::from_utf8_lossy(&bytes);

    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    lines.reverse();
    if let Some(max) = max_scanned {
        lines.truncate(max);
    }

    debug!("read {} history lines from {:?}", lines.len(), path);
    Ok(Box::new(lines.into_iter()))
}

/// Read the recent directory log, newest first
///
/// Entries are sanitized, relative or empty entries are skipped and only the
/// most recent occurrence of a directory is kept.
pub fn read_recent_dirs(path: &Path, max: usize) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read directory history: {:?}", path))?;
    Ok(recent_dirs_from_log(&content, max))
}

/// Newest-first, deduplicated directories of a directory log
pub fn recent_dirs_from_log(content: &str, max: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    content
        .lines()
        .rev()
        .map(sanitize_dir)
        .filter(|dir| dir.starts_with('/'))
        .filter(|dir| seen.insert(dir.clone()))
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_history_is_read_newest_first() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("history");
        fs::write(&path, "ls\ncd /tmp\nvim notes.md\n").unwrap();

        let lines: Vec<String> = read_history_lines(&path, None).unwrap().collect();
        assert_eq!(lines, vec!["vim notes.md", "cd /tmp", "ls"]);

        let lines: Vec<String> = read_history_lines(&path, Some(2)).unwrap().collect();
        assert_eq!(lines, vec!["vim notes.md", "cd /tmp"]);
    }

    #[test]
    fn test_history_with_invalid_utf8() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("history");
        fs::write(&path, b"cat caf\xe9.txt\nls /tmp\n").unwrap();

        let lines: Vec<String> = read_history_lines(&path, None).unwrap().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "ls /tmp");
    }

    #[test]
    fn test_missing_history_file() {
        let temp = tempdir().unwrap();
        assert!(read_history_lines(&temp.path().join("nope"), None).is_err());
    }

    #[test]
    fn test_recent_dirs_from_log() {
        let log = "/a\n/b/\nrelative\n\n/a\n/c\n";
        assert_eq!(recent_dirs_from_log(log, 10), vec!["/c", "/a", "/b"]);
        assert_eq!(recent_dirs_from_log(log, 2), vec!["/c", "/a"]);
        assert_eq!(recent_dirs_from_log("/\n", 10), vec!["/"]);
    }

    #[test]
    fn test_read_recent_dirs() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("dirs");
        fs::write(&path, "/home/me\n/home/me/project\n").unwrap();
        assert_eq!(
            read_recent_dirs(&path, 20).unwrap(),
            vec!["/home/me/project", "/home/me"]
        );
    }
}
