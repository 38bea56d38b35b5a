//! Photo Organizer - in-place media renaming by capture date
//!
//! This library renames photos and videos inside a directory tree to a
//! canonical `YYYY-MM-DD HH.MM.SS` name, resolving each file's capture
//! date from:
//! - EXIF metadata (images)
//! - filename timestamp patterns
//! - file system modification time (videos)
//!
//! A second mode deletes exact duplicate files by SHA-256 content hash.

pub mod cli;
pub mod config;
pub mod dedup;
pub mod error;
pub mod hash;
pub mod naming;
pub mod organize;
pub mod time;

pub use cli::{Cli, Command};
pub use config::{Config, MediaKind};
pub use dedup::{DedupStats, eliminate_duplicates};
pub use error::{Error, Result};
pub use organize::{FileReport, Organizer, OrganizeStats, Outcome};
pub use time::{DateSource, ResolvedDate};
