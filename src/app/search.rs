//! `search` command: stream recently used files out of history

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::app::{absolute_dir, candidate_policy};
use crate::command::extractor::{FileChecker, FileExtractor, FsChecker};
use crate::command::resolver::PathResolver;
use crate::core::model::{ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::file_meta;
use crate::search::history::{read_history_lines, read_recent_dirs};
use crate::search::scanner::{CommandSource, FileSource, SearchOptions, TrackedSource};
use crate::search::session::{HistoryLines, Search};
use crate::search::store::FileHistoryStore;

/// Everything the search command was asked to do
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub history: Option<PathBuf>,
    pub dirs: Option<PathBuf>,
    pub max_dirs: usize,
    pub max_results: Option<usize>,
    pub filter: Option<String>,
    pub max_scanned: Option<usize>,
    /// Read this tracked-files history instead of shell history
    pub file_history: Option<PathBuf>,
    pub passive_commands: Vec<String>,
}

/// Run the search command
pub fn run_search(request: SearchRequest, config: RenderConfig) -> Result<()> {
    let checker: Arc<dyn FileChecker> = Arc::new(FsChecker);
    let (lines, source) = match &request.file_history {
        Some(path) => tracked_input(path, request.max_scanned, checker)?,
        None => history_input(&request, checker)?,
    };

    let options = SearchOptions {
        max_results: request.max_results,
        filter: request.filter,
    };
    let search = Search::new(options, lines, source)?;

    let (tx, rx) = crossbeam_channel::unbounded::<Vec<String>>();
    search.start(
        move |files| {
            // the receiver is gone once output failed
            let _ = tx.send(files);
        },
        || debug!("search thread done"),
    )?;

    let renderer = Renderer::with_config(config);
    let mut stdout = io::stdout().lock();
    let mut collected = ResultSet::new();
    let mut rank = 0;

    'batches: for batch in rx.iter() {
        for path in batch {
            rank += 1;
            let item = ResultItem::file(&path, rank).with_meta(file_meta(Path::new(&path)));
            if !renderer.is_streaming() {
                collected.push(item);
                continue;
            }
            if let Err(e) = write_item(&mut stdout, &renderer, &item, rank == 1) {
                if e.kind() == io::ErrorKind::BrokenPipe {
                    debug!("stdout closed, cancelling search");
                    search.cancel();
                    break 'batches;
                }
                search.cancel();
                return Err(e).context("Failed to write results");
            }
        }
    }
    drop(rx);
    search.join();

    if !renderer.is_streaming() {
        writeln!(stdout, "{}", renderer.render(&collected)).context("Failed to write results")?;
    }

    debug!(
        state = ?search.state(),
        done = search.is_done(),
        results = rank,
        "search output done"
    );
    Ok(())
}

fn write_item(
    out: &mut impl Write,
    renderer: &Renderer,
    item: &ResultItem,
    first: bool,
) -> io::Result<()> {
    if first {
        if let Some(header) = renderer.header() {
            out.write_all(header.as_bytes())?;
        }
    }
    out.write_all(renderer.render_item(item).as_bytes())?;
    out.flush()
}

fn tracked_input(
    path: &Path,
    max_scanned: Option<usize>,
    checker: Arc<dyn FileChecker>,
) -> Result<(HistoryLines, Box<dyn FileSource>)> {
    let store = FileHistoryStore::open_or_create(path)?;
    let mut entries = store.read_lines()?;
    entries.reverse();
    if let Some(max) = max_scanned {
        entries.truncate(max);
    }
    debug!("read {} tracked entries from {:?}", entries.len(), store.path());
    let lines: HistoryLines = Box::new(entries.into_iter());
    let source: Box<dyn FileSource> = Box::new(TrackedSource::new(checker));
    Ok((lines, source))
}

fn history_input(
    request: &SearchRequest,
    checker: Arc<dyn FileChecker>,
) -> Result<(HistoryLines, Box<dyn FileSource>)> {
    let history = request
        .history
        .as_deref()
        .context("No shell history: pass --history or set HISTFILE")?;
    let lines = read_history_lines(history, request.max_scanned)?;
    let dirs = directory_window(request.dirs.as_deref(), request.max_dirs)?;
    debug!("directory window: {:?}", dirs);

    let extractor = FileExtractor::new(checker)
        .with_policy(candidate_policy(&request.passive_commands))
        .with_resolver(PathResolver::from_env());
    let source: Box<dyn FileSource> = Box::new(CommandSource::new(extractor, dirs));
    Ok((lines, source))
}

/// Recent directories, falling back to the current directory
fn directory_window(dirs_log: Option<&Path>, max_dirs: usize) -> Result<Vec<String>> {
    let mut dirs = match dirs_log {
        Some(path) if path.exists() => read_recent_dirs(path, max_dirs)?,
        Some(path) => {
            warn!("directory history {:?} not found, using the current directory", path);
            Vec::new()
        }
        None => Vec::new(),
    };
    if dirs.is_empty() {
        dirs.push(absolute_dir(Path::new("."))?);
    }
    Ok(dirs)
}
