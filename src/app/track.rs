//! `track` command: record the files a command operated on

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::app::{absolute_dir, candidate_policy, print_result_set};
use crate::command::extractor::{FileExtractor, FsChecker};
use crate::command::resolver::PathResolver;
use crate::core::model::{ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::file_meta;
use crate::search::store::FileHistoryStore;

/// Run the track command
pub fn run_track(
    dir: &Path,
    cmd: &str,
    file_history: &Path,
    passive_commands: &[String],
    config: RenderConfig,
) -> Result<()> {
    let dir = absolute_dir(dir)?;
    let store = FileHistoryStore::open_or_create(file_history)?;

    let files = track_command(&store, &dir, cmd, passive_commands)?;

    let mut result_set = ResultSet::new();
    for (i, file) in files.iter().enumerate() {
        result_set.push(ResultItem::file(file, i + 1).with_meta(file_meta(Path::new(file))));
    }
    debug!("tracked {} files from '{}'", result_set.len(), cmd);
    print_result_set(&Renderer::with_config(config), &result_set)
}

/// Append the files `cmd` operated on in `dir` to the store
pub fn track_command(
    store: &FileHistoryStore,
    dir: &str,
    cmd: &str,
    passive_commands: &[String],
) -> Result<Vec<String>> {
    let extractor = FileExtractor::new(Arc::new(FsChecker))
        .with_policy(candidate_policy(passive_commands))
        .with_resolver(PathResolver::from_env());
    let files = extractor.find_files_in_command(cmd, &[dir.to_string()]);
    store.append(&files)?;
    Ok(files)
}
