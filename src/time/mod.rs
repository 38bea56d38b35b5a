//! Date extraction for media files
//!
//! Capture dates come from three sources, tried in order by the
//! resolution engine in `organize`:
//! - EXIF metadata (images)
//! - Filename patterns
//! - File system modification time (videos)

pub mod exif;
pub mod filename;

use crate::error::Result;
use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;

/// A validated capture date/time, naive local time
pub type ResolvedDate = NaiveDateTime;

/// Source of a resolved date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// Read from embedded EXIF metadata
    Exif,
    /// Parsed from the filename
    Filename,
    /// File system modification time
    Mtime,
}

/// Read a file's modification time as a naive local datetime
pub fn read_mtime(path: &Path) -> Result<ResolvedDate> {
    let metadata = fs::metadata(path)?;
    let modified = metadata.modified()?;
    let datetime: chrono::DateTime<chrono::Local> = modified.into();
    Ok(datetime.naive_local())
}
