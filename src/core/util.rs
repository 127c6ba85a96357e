//! Common utilities

use chrono::{DateTime, Local, Utc};
use std::path::Path;
use std::time::SystemTime;

use crate::core::model::Meta;

/// Get file modification time in milliseconds since epoch
pub fn get_mtime_ms(path: &Path) -> std::io::Result<i64> {
    let metadata = std::fs::metadata(path)?;
    let mtime = metadata.modified()?;
    let duration = mtime
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    Ok(duration.as_millis() as i64)
}

/// Get file size in bytes
pub fn get_file_size(path: &Path) -> std::io::Result<u64> {
    let metadata = std::fs::metadata(path)?;
    Ok(metadata.len())
}

/// Collect display metadata; unreadable files simply get none
pub fn file_meta(path: &Path) -> Meta {
    Meta {
        mtime_ms: get_mtime_ms(path).ok(),
        size: get_file_size(path).ok(),
    }
}

/// Format an epoch millisecond timestamp in local time
pub fn format_mtime(mtime_ms: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(mtime_ms)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
}
