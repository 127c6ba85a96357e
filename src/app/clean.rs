//! `clean` command: prune the tracked-files history

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::app::print_result_set;
use crate::command::extractor::FsChecker;
use crate::core::model::{ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::search::store::FileHistoryStore;

/// Run the clean command
///
/// Removed entries are written to stdout, the summary to stderr.
pub fn run_clean(file_history: &Path, quiet: bool, config: RenderConfig) -> Result<()> {
    let store = FileHistoryStore::open_or_create(file_history)?;
    let report = store.clean(&FsChecker)?;
    info!(kept = report.kept, removed = report.removed.len(), "file history cleaned");

    let mut result_set = ResultSet::new();
    for path in &report.removed {
        result_set.push(ResultItem::removed(path));
    }
    print_result_set(&Renderer::with_config(config), &result_set)?;

    if !quiet {
        eprintln!(
            "Kept {} entries, removed {} from {}",
            report.kept,
            report.removed.len(),
            store.path().display()
        );
    }
    Ok(())
}
