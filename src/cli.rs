//! CLI argument parsing with clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Photo Organizer - in-place media renaming by capture date
///
/// Renames photos and videos to their capture date, resolved from EXIF
/// metadata, filename patterns or file timestamps, and can delete exact
/// duplicate files by content hash. Without a command an interactive
/// menu runs against the current working directory.
#[derive(Parser, Debug)]
#[command(name = "photo-organizer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rename photos and videos to their canonical capture-date names
    Organize {
        /// Root directory to process (default: current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },
    /// Delete exact duplicate files, keeping the first copy seen
    Dedup {
        /// Root directory to process (default: current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },
}
