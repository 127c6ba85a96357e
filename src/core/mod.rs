//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Unified result model (ResultItem)
//! - Rendering functions for different output formats
//! - POSIX path helpers used by the resolver
//! - File metadata utilities

pub mod model;
pub mod paths;
pub mod render;
pub mod util;
