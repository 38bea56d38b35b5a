//! Photo Organizer - in-place media renaming by capture date
//!
//! With a subcommand the tool runs one pass and exits; without one it
//! drops into an interactive menu rooted at the current directory.

use anyhow::Result;
use clap::Parser;
use photo_organizer::{Cli, Command, Config, Organizer, OrganizeStats, eliminate_duplicates};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    info!(version = env!("CARGO_PKG_VERSION"), "Photo Organizer starting");

    match cli.command {
        Some(Command::Organize { root }) => run_organize(&resolve_root(root)?),
        Some(Command::Dedup { root }) => run_dedup(&resolve_root(root)?),
        None => run_menu(&resolve_root(None)?),
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(root) => Ok(root),
        None => Ok(std::env::current_dir()?),
    }
}

fn run_organize(root: &Path) -> Result<()> {
    let organizer = Organizer::new(Config::default());
    let reports = organizer.run(root)?;
    let stats = OrganizeStats::from_reports(&reports);

    println!("\nOrganize complete ({})", root.display());
    println!("  Renamed:        {}", stats.renamed);
    println!("  Already named:  {}", stats.already_canonical);
    println!("  No date found:  {}", stats.no_date);
    println!("  Invalid date:   {}", stats.invalid_date);
    println!("  Failed:         {}", stats.failed);

    if stats.failed > 0 {
        println!("\nFailures:");
        for report in &reports {
            if let photo_organizer::Outcome::Failed { message } = &report.outcome {
                println!("  {}: {}", report.path.display(), message);
            }
        }
    }

    Ok(())
}

fn run_dedup(root: &Path) -> Result<()> {
    let stats = eliminate_duplicates(root)?;

    println!("\nDuplicate elimination complete ({})", root.display());
    println!("  Files scanned:  {}", stats.scanned);
    println!("  Deleted:        {}", stats.deleted);
    println!("  Failed:         {}", stats.failed);

    Ok(())
}

/// Interactive menu loop on stdin, rooted at the working directory
fn run_menu(root: &Path) -> Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("\nPhoto Organizer — {}", root.display());
        println!("  [1] Organize photos and videos");
        println!("  [2] Delete duplicate files");
        println!("  [3] Exit");
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            // stdin closed
            return Ok(());
        };

        match line?.trim() {
            "1" => {
                if let Err(e) = run_organize(root) {
                    eprintln!("Error: {e}");
                }
            }
            "2" => {
                if let Err(e) = run_dedup(root) {
                    eprintln!("Error: {e}");
                }
            }
            "3" | "q" | "exit" => return Ok(()),
            other => println!("Unknown choice: {other}"),
        }
    }
}
