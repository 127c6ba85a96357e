//! Search module - Streams found files out of history
//!
//! Provides:
//! - scanner: the per-search state machine (dedup, filter, cap, cancel)
//! - session: runs a scanner on its own thread
//! - filter: regex filtering of found files
//! - history: newest-first history and recent directory readers
//! - store: the tracked-files history (track/clean)

pub mod filter;
pub mod history;
pub mod scanner;
pub mod session;
pub mod store;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid filter pattern: {0}")]
    InvalidFilter(#[from] regex::Error),

    #[error("search has already been started")]
    AlreadyStarted,
}
