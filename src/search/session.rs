//! Background search session
//!
//! Runs a [`Scanner`] on a dedicated thread so that slow history scans never
//! block the caller. Results are delivered through callbacks executed on the
//! worker thread; handing them to another thread is the caller's job.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

use crate::search::scanner::{FileSource, Scanner, SearchOptions, SearchOutcome};
use crate::search::SearchError;

/// Newest-first history lines
pub type HistoryLines = Box<dyn Iterator<Item = String> + Send>;

/// Lifecycle of a search session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Running,
    Completed,
    Capped,
    Cancelled,
}

impl SearchState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SearchState::Completed | SearchState::Capped | SearchState::Cancelled
        )
    }
}

impl From<SearchOutcome> for SearchState {
    fn from(outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Completed => SearchState::Completed,
            SearchOutcome::Capped => SearchState::Capped,
            SearchOutcome::Cancelled => SearchState::Cancelled,
        }
    }
}

struct SearchInner {
    state: Mutex<SearchState>,
    cancelled: AtomicBool,
}

impl SearchInner {
    fn state(&self) -> SearchState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: SearchState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

/// Stores the final state and fires `on_done` when the worker finishes,
/// including when it unwinds
struct Finish<D: FnOnce()> {
    inner: Arc<SearchInner>,
    state: SearchState,
    on_done: Option<D>,
}

impl<D: FnOnce()> Drop for Finish<D> {
    fn drop(&mut self) {
        self.inner.set_state(self.state);
        if let Some(on_done) = self.on_done.take() {
            on_done();
        }
    }
}

/// Everything the worker consumes
struct Job {
    scanner: Scanner,
    lines: HistoryLines,
    source: Box<dyn FileSource>,
}

/// A single, cancellable search over history lines
pub struct Search {
    inner: Arc<SearchInner>,
    job: Mutex<Option<Job>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Search {
    /// Prepare a search; fails when the filter pattern does not compile
    pub fn new(
        options: SearchOptions,
        lines: HistoryLines,
        source: Box<dyn FileSource>,
    ) -> Result<Self, SearchError> {
        let scanner = Scanner::new(&options)?;
        Ok(Self {
            inner: Arc::new(SearchInner {
                state: Mutex::new(SearchState::Idle),
                cancelled: AtomicBool::new(false),
            }),
            job: Mutex::new(Some(Job {
                scanner,
                lines,
                source,
            })),
            handle: Mutex::new(None),
        })
    }

    /// Start the worker
    ///
    /// `on_found` receives each batch of new files in history order,
    /// `on_done` fires exactly once after the search reached a final state.
    /// A panicking `on_found` ends the search as `Cancelled`.
    pub fn start<F, D>(&self, on_found: F, on_done: D) -> Result<(), SearchError>
    where
        F: FnMut(Vec<String>) + Send + 'static,
        D: FnOnce() + Send + 'static,
    {
        let job = self
            .job
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(SearchError::AlreadyStarted)?;

        self.inner.set_state(SearchState::Running);
        debug!("starting search thread");

        let inner = Arc::clone(&self.inner);
        let handle = thread::spawn(move || {
            let Job {
                scanner,
                lines,
                source,
            } = job;
            let mut finish = Finish {
                inner: Arc::clone(&inner),
                state: SearchState::Cancelled,
                on_done: Some(on_done),
            };
            let outcome = scanner.run(lines, source.as_ref(), &inner.cancelled, on_found);
            finish.state = outcome.into();
        });

        *self.handle.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Ok(())
    }

    /// Request cancellation; takes effect before the next history line
    ///
    /// Does nothing unless the search is running.
    pub fn cancel(&self) {
        if self.inner.state() == SearchState::Running {
            debug!("ending search");
            self.inner.cancelled.store(true, Ordering::Relaxed);
        }
    }

    pub fn state(&self) -> SearchState {
        self.inner.state()
    }

    pub fn is_done(&self) -> bool {
        self.state().is_terminal()
    }

    /// Wait for the worker to finish
    pub fn join(&self) {
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("search thread panicked");
            }
        }
    }
}

impl Drop for Search {
    fn drop(&mut self) {
        self.cancel();
    }
}
