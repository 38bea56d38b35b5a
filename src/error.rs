//! Error types for the photo organizer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for photo organizer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the photo organizer
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write EXIF data to {path}: {message}")]
    ExifWrite { path: PathBuf, message: String },

    #[error("EXIF writing is not supported for {path}: {message}")]
    ExifWriteUnsupported { path: PathBuf, message: String },

    #[error("File hash computation failed for {path}: {message}")]
    HashComputation { path: PathBuf, message: String },

    #[error("Failed to rename {from} to {to}: {message}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },

    #[error("Invalid file name: {path}")]
    InvalidFileName { path: PathBuf },

    #[error("Could not find a collision-free name for {path}")]
    NameExhausted { path: PathBuf },

    #[error("Root directory is not readable: {path}: {message}")]
    UnreadableRoot { path: PathBuf, message: String },
}
