//! Candidate extraction
//!
//! Removes everything from a command stage that is certainly not a file:
//! the program name (and a `sudo` prefix), redirect operators and flags.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Redirect operators skipped during extraction
pub const REDIRECT_SYMBOLS: &[&str] = &[">", ">>", "<", "<<"];

/// Redirects that write to a file, which keeps no-file commands in play
pub const OUTPUT_REDIRECTS: &[&str] = &[">", ">>"];

/// Commands that never take a file argument
pub const DEFAULT_PASSIVE_COMMANDS: &[&str] = &[
    "cd", "pwd", "exit", "echo", "clear", "logout", "history", "set", "unset", "alias", "unalias",
    "export", "source", "trap", "fg", "bg", "jobs", "kill", "disown", "wait", "shift", "times",
    "help", "type", "true", "false", "test", "local", "readonly",
];

static DEFAULT_POLICY: Lazy<CandidatePolicy> = Lazy::new(CandidatePolicy::new);

/// Decides which words of a command stage may name a file
#[derive(Debug, Clone)]
pub struct CandidatePolicy {
    passive_commands: HashSet<String>,
}

impl Default for CandidatePolicy {
    fn default() -> Self {
        DEFAULT_POLICY.clone()
    }
}

impl CandidatePolicy {
    /// Policy with the built-in no-file command table
    pub fn new() -> Self {
        Self {
            passive_commands: DEFAULT_PASSIVE_COMMANDS
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }

    /// Policy with an empty no-file command table
    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            passive_commands: HashSet::new(),
        }
    }

    /// Extend the no-file command table
    pub fn with_extra_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.passive_commands.extend(
            commands
                .into_iter()
                .map(Into::into)
                .map(|c: String| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        );
        self
    }

    pub fn is_passive(&self, command: &str) -> bool {
        self.passive_commands.contains(command)
    }

    /// Whether a stage cannot reference a file at all
    ///
    /// `echo foo` cannot, `echo foo > bar` can.
    pub fn skips_stage(&self, words: &[String]) -> bool {
        if words.len() <= 1 {
            return !contains_output_redirect(words);
        }
        self.runs_passive_program(words) && !contains_output_redirect(words)
    }

    fn runs_passive_program(&self, words: &[String]) -> bool {
        words
            .get(initial_skip_count(words) - 1)
            .is_some_and(|program| self.is_passive(program))
    }

    /// Path candidates of one stage, in order
    pub fn extract_candidates(&self, words: &[String]) -> Vec<String> {
        if self.skips_stage(words) {
            return Vec::new();
        }

        // a no-file command only touches its redirect targets
        if self.runs_passive_program(words) {
            return redirect_targets(words);
        }

        let mut candidates = Vec::new();
        let mut i = initial_skip_count(words);

        while i < words.len() {
            let word = words[i].as_str();

            if REDIRECT_SYMBOLS.contains(&word) || word.starts_with('-') {
                i += 1;
                continue;
            }

            if word == "sudo" {
                // sudo and the program it runs
                i += 2;
                continue;
            }

            candidates.push(word.to_string());
            i += 1;
        }

        candidates
    }
}

/// Skip the program name, or `sudo` and the program name
fn initial_skip_count(words: &[String]) -> usize {
    if words.len() > 1 && words[0] == "sudo" {
        2
    } else {
        1
    }
}

/// Words directly following `>` or `>>`
fn redirect_targets(words: &[String]) -> Vec<String> {
    words
        .windows(2)
        .filter(|pair| OUTPUT_REDIRECTS.contains(&pair[0].as_str()))
        .map(|pair| pair[1].clone())
        .filter(|target| !REDIRECT_SYMBOLS.contains(&target.as_str()))
        .collect()
}

pub fn contains_output_redirect(words: &[String]) -> bool {
    words.iter().any(|w| OUTPUT_REDIRECTS.contains(&w.as_str()))
}
