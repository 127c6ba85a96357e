//! Path resolution against the recent directory window
//!
//! Turns a raw candidate into the string that is finally joined with (or
//! checked instead of) the recent directories:
//! - `~/notes.md` -> `/home/me/notes.md`
//! - `../../notes.md` -> `notes.md`, every directory loses two components
//! - `./notes.md` -> `notes.md`

use crate::core::paths::{expand_home, normalize, reduce_paths, split_parent_components};

/// Resolves `~`, `..` and `./` in file candidates
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    home: Option<String>,
}

impl PathResolver {
    pub fn new(home: Option<String>) -> Self {
        Self {
            home: home.filter(|h| !h.is_empty()),
        }
    }

    /// Resolver using `$HOME`
    pub fn from_env() -> Self {
        Self::new(std::env::var("HOME").ok())
    }

    /// Resolve a candidate, returning it with the directory window it must be
    /// tried against
    ///
    /// The input window is never modified; when `..` components are consumed a
    /// shrunk copy is returned.
    pub fn resolve(&self, candidate: &str, dirs: &[String]) -> (String, Vec<String>) {
        let file = self.resolve_home(candidate);
        let (file, dirs) = resolve_parent_directories(&file, dirs);
        (resolve_dot_slash(&file), dirs)
    }

    fn resolve_home(&self, candidate: &str) -> String {
        match &self.home {
            Some(home) => expand_home(candidate, home),
            None => candidate.to_string(),
        }
    }
}

/// Consume `..` components, shrinking the window accordingly
pub fn resolve_parent_directories(file: &str, dirs: &[String]) -> (String, Vec<String>) {
    let normalized = normalize(file);
    let (parents, rest) = split_parent_components(&normalized);

    if parents > 0 {
        (rest, reduce_paths(dirs, parents))
    } else {
        (normalized, dirs.to_vec())
    }
}

pub fn resolve_dot_slash(file: &str) -> String {
    file.strip_prefix("./").unwrap_or(file).to_string()
}
