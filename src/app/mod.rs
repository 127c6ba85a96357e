//! Command handlers
//!
//! One module per subcommand. Each handler wires the core components
//! together and writes result items to stdout.

pub mod clean;
pub mod search;
pub mod track;

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::command::candidates::CandidatePolicy;
use crate::core::model::ResultSet;
use crate::core::paths::{normalize, sanitize_dir};
use crate::core::render::Renderer;

/// Built-in no-file commands extended with user supplied ones
pub(crate) fn candidate_policy(passive_commands: &[String]) -> CandidatePolicy {
    CandidatePolicy::new().with_extra_commands(passive_commands.iter().cloned())
}

/// Absolute, normalized form of a directory argument without trailing '/'
pub(crate) fn absolute_dir(dir: &Path) -> Result<String> {
    let dir = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to read the current directory")?
            .join(dir)
    };
    Ok(sanitize_dir(&normalize(&dir.to_string_lossy())))
}

/// Write a complete result set to stdout
pub(crate) fn print_result_set(renderer: &Renderer, result_set: &ResultSet) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    renderer
        .render_to(result_set, &mut stdout)
        .context("Failed to write results")?;
    // json is the only format without a trailing newline
    if !renderer.is_streaming() {
        writeln!(stdout).context("Failed to write results")?;
    }
    Ok(())
}
