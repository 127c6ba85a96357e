//! File extraction from command lines
//!
//! Ties tokenizer, candidate policy and resolver together and keeps only the
//! candidates that exist on disk.

use std::fs::Metadata;
use std::io::{self, ErrorKind};
use std::sync::Arc;
use tracing::debug;

use crate::command::candidates::CandidatePolicy;
use crate::command::resolver::PathResolver;
use crate::command::tokenizer::tokenize;
use crate::core::paths::join_dir;

/// Existence predicate for file candidates
pub trait FileChecker: Send + Sync {
    fn is_file(&self, path: &str) -> bool;
}

impl<F> FileChecker for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_file(&self, path: &str) -> bool {
        self(path)
    }
}

/// Filesystem backed checker
///
/// A path we are not allowed to inspect is presumed to exist: the user
/// referenced it, it is just not readable for us.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsChecker;

impl FileChecker for FsChecker {
    fn is_file(&self, path: &str) -> bool {
        is_file_from(std::fs::metadata(path))
    }
}

fn is_file_from(metadata: io::Result<Metadata>) -> bool {
    match metadata {
        Ok(meta) => meta.is_file(),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => true,
        Err(_) => false,
    }
}

/// Extracts the files a command operated on
#[derive(Clone)]
pub struct FileExtractor {
    checker: Arc<dyn FileChecker>,
    policy: CandidatePolicy,
    resolver: PathResolver,
}

impl FileExtractor {
    pub fn new(checker: Arc<dyn FileChecker>) -> Self {
        Self {
            checker,
            policy: CandidatePolicy::default(),
            resolver: PathResolver::from_env(),
        }
    }

    pub fn with_policy(mut self, policy: CandidatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_resolver(mut self, resolver: PathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Existing files referenced by `line`, in token order
    ///
    /// Relative candidates are tried against every directory of `dirs`; each
    /// directory containing the file contributes its own entry.
    pub fn find_files_in_command(&self, line: &str, dirs: &[String]) -> Vec<String> {
        debug!("checking cmd for files: '{}'", line.trim_end());

        let tree = match tokenize(line) {
            Ok(tree) => tree,
            Err(e) => {
                debug!("skipping line: {}", e);
                return Vec::new();
            }
        };

        // single word commands cannot contain a file
        if tree.len() <= 1 {
            return Vec::new();
        }

        let mut files = Vec::new();
        for group in tree.leaf_groups() {
            debug!("sub cmd: {:?}", group);
            let candidates = self.policy.extract_candidates(&group);
            if candidates.is_empty() {
                continue;
            }
            debug!("candidates: {:?}", candidates);

            for candidate in candidates {
                let (file, window) = self.resolver.resolve(candidate.trim_end(), dirs);
                if file.trim().is_empty() {
                    continue;
                }

                if file.starts_with('/') {
                    self.add_if_exists(&mut files, file);
                    continue;
                }

                for dir in &window {
                    self.add_if_exists(&mut files, join_dir(dir, &file));
                }
            }
        }

        files
    }

    fn add_if_exists(&self, files: &mut Vec<String>, path: String) {
        if self.checker.is_file(&path) {
            debug!("found file: {}", path);
            files.push(path);
        }
    }
}
