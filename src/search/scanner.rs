//! Search state machine
//!
//! Walks history lines newest-first and reports every newly found file
//! exactly once, in scan order, until the lines run out, the result cap is
//! reached or the search is cancelled.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::command::extractor::{FileChecker, FileExtractor};
use crate::search::filter::FileFilter;
use crate::search::SearchError;

/// Expands one history line into the files it references
pub trait FileSource: Send {
    fn files_in_line(&self, line: &str) -> Vec<String>;
}

/// Shell history: lines are commands resolved against recent directories
pub struct CommandSource {
    extractor: FileExtractor,
    dirs: Vec<String>,
}

impl CommandSource {
    /// `dirs` must be absolute, most recent first, without trailing '/'
    pub fn new(extractor: FileExtractor, dirs: Vec<String>) -> Self {
        Self { extractor, dirs }
    }
}

impl FileSource for CommandSource {
    fn files_in_line(&self, line: &str) -> Vec<String> {
        self.extractor.find_files_in_command(line, &self.dirs)
    }
}

/// Tracked-files history: every line already is an absolute path
pub struct TrackedSource {
    checker: Arc<dyn FileChecker>,
}

impl TrackedSource {
    pub fn new(checker: Arc<dyn FileChecker>) -> Self {
        Self { checker }
    }
}

impl FileSource for TrackedSource {
    fn files_in_line(&self, line: &str) -> Vec<String> {
        let path = line.trim();
        if path.starts_with('/') && self.checker.is_file(path) {
            vec![path.to_string()]
        } else {
            Vec::new()
        }
    }
}

/// Parameters of one search
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Stop after this many files; `None` scans everything
    pub max_results: Option<usize>,
    /// Only report files whose path matches this regex
    pub filter: Option<String>,
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Completed,
    Capped,
    Cancelled,
}

/// Per-search state: seen commands, emitted files and the result cap
#[derive(Debug)]
pub struct Scanner {
    max_results: Option<usize>,
    filter: FileFilter,
    seen_commands: HashSet<String>,
    emitted: HashSet<String>,
}

impl Scanner {
    pub fn new(options: &SearchOptions) -> Result<Self, SearchError> {
        Ok(Self {
            max_results: options.max_results,
            filter: FileFilter::new(options.filter.as_deref())?,
            seen_commands: HashSet::new(),
            emitted: HashSet::new(),
        })
    }

    /// Scan `lines`, calling `on_found` once per line that produced new files
    ///
    /// `cancel` is checked before every line; a line that is being processed
    /// when cancellation is requested still completes.
    pub fn run<I, F>(
        mut self,
        lines: I,
        source: &dyn FileSource,
        cancel: &AtomicBool,
        mut on_found: F,
    ) -> SearchOutcome
    where
        I: IntoIterator<Item = String>,
        F: FnMut(Vec<String>),
    {
        info!(
            "search started (max_results={:?}, filter={})",
            self.max_results,
            self.filter.is_active()
        );

        if self.cap_reached() {
            return self.finish(SearchOutcome::Capped);
        }

        for line in lines {
            if cancel.load(Ordering::Relaxed) {
                return self.finish(SearchOutcome::Cancelled);
            }

            let batch = self.process_line(&line, source);
            if batch.is_empty() {
                continue;
            }

            let batch = self.cap_batch(batch);
            self.emitted.extend(batch.iter().cloned());
            on_found(batch);

            if self.cap_reached() {
                return self.finish(SearchOutcome::Capped);
            }
        }

        self.finish(SearchOutcome::Completed)
    }

    /// New, accepted files of one line
    fn process_line(&mut self, line: &str, source: &dyn FileSource) -> Vec<String> {
        if line.trim().is_empty() || self.seen_commands.contains(line) {
            return Vec::new();
        }
        self.seen_commands.insert(line.to_string());

        let mut batch: Vec<String> = Vec::new();
        for file in source.files_in_line(line) {
            if self.emitted.contains(&file) || batch.contains(&file) {
                continue;
            }
            if !self.filter.accept(&file) {
                debug!("filtered out: {}", file);
                continue;
            }
            batch.push(file);
        }
        batch
    }

    /// Truncate a batch so the cap is never exceeded
    fn cap_batch(&self, mut batch: Vec<String>) -> Vec<String> {
        if let Some(max) = self.max_results {
            batch.truncate(max.saturating_sub(self.emitted.len()));
        }
        batch
    }

    fn cap_reached(&self) -> bool {
        self.max_results
            .is_some_and(|max| self.emitted.len() >= max)
    }

    fn finish(&self, outcome: SearchOutcome) -> SearchOutcome {
        info!(
            "search finished: {:?} ({} files, {} commands)",
            outcome,
            self.emitted.len(),
            self.seen_commands.len()
        );
        outcome
    }
}
