//! Tracked-files history
//!
//! A plain text file with one absolute path per line, oldest first. `track`
//! appends to it, `clean` rewrites it, `search --tracked` reads it.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::command::extractor::FileChecker;

/// Result of a clean run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub kept: usize,
    pub removed: Vec<String>,
}

/// Handle to the tracked-files history
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    /// Open the store, creating an empty file when it is missing
    pub fn open_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("file history not found, creating {:?}", path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
            File::create(path)
                .with_context(|| format!("Failed to create file history: {:?}", path))?;
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append paths, one per line
    ///
    /// A file not ending in a newline gets one first, so entries never merge.
    pub fn append(&self, files: &[String]) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open file history: {:?}", self.path))?;

        let mut out = String::new();
        if needs_leading_newline(&mut file)? {
            out.push('\n');
        }
        for path in files {
            debug!("adding line to file history: {}", path);
            out.push_str(path.trim());
            out.push('\n');
        }

        file.write_all(out.as_bytes())
            .with_context(|| format!("Failed to write file history: {:?}", self.path))?;
        Ok(())
    }

    /// All entries, oldest first
    pub fn read_lines(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read file history: {:?}", self.path))?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Drop entries that are no longer files and duplicates
    ///
    /// The most recent occurrence of a duplicate survives.
    pub fn clean(&self, checker: &dyn FileChecker) -> Result<CleanReport> {
        let lines = self.read_lines()?;
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        let mut removed = Vec::new();

        for line in lines.into_iter().rev() {
            if seen.contains(&line) {
                continue;
            }
            seen.insert(line.clone());
            if checker.is_file(&line) {
                kept.push(line);
            } else {
                removed.push(line);
            }
        }
        kept.reverse();

        let mut content = kept.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to rewrite file history: {:?}", self.path))?;

        Ok(CleanReport {
            kept: kept.len(),
            removed,
        })
    }
}

fn needs_leading_newline(file: &mut File) -> Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
