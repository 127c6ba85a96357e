//! Command module - Turns shell history lines into files
//!
//! Provides:
//! - tokenizer: quote-aware splitting into stages, subshell unwrapping
//! - candidates: removal of program names, flags and redirect operators
//! - resolver: `~`, `..` and `./` handling against recent directories
//! - extractor: existence checks producing the final file list

pub mod candidates;
pub mod extractor;
pub mod resolver;
pub mod tokenizer;
