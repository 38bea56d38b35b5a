//! Content-hash based duplicate elimination
//!
//! Walks a directory tree, hashes every regular file's full content and
//! deletes byte-identical copies, keeping the first file seen in
//! traversal order. Purely content-based: extensions and metadata are
//! ignored, so a renamed copy of a photo is still a duplicate.

use crate::error::{Error, Result};
use crate::hash::compute_file_hash;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Summary of one duplicate-elimination run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DedupStats {
    /// Regular files visited
    pub scanned: usize,
    /// Duplicate files deleted
    pub deleted: usize,
    /// Files skipped because hashing or deletion failed
    pub failed: usize,
}

impl DedupStats {
    pub fn summary(&self) -> String {
        format!(
            "Scanned: {}, Deleted: {}, Failed: {}",
            self.scanned, self.deleted, self.failed
        )
    }
}

/// Delete exact duplicate files under `root`
///
/// The first file observed with a given digest is never touched;
/// every later byte-identical file is removed. Per-file hash or delete
/// failures are logged and counted, and the scan continues. Only an
/// unreadable root aborts the run.
pub fn eliminate_duplicates(root: &Path) -> Result<DedupStats> {
    fs::read_dir(root).map_err(|e| Error::UnreadableRoot {
        path: root.to_path_buf(),
        message: e.to_string(),
    })?;

    info!(?root, "Scanning for duplicate files");

    let mut index: HashMap<String, PathBuf> = HashMap::new();
    let mut stats = DedupStats::default();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        stats.scanned += 1;

        let hash = match compute_file_hash(path) {
            Ok(hash) => hash,
            Err(e) => {
                warn!(?path, error = %e, "Failed to hash file");
                stats.failed += 1;
                continue;
            }
        };

        match index.get(&hash) {
            Some(original) => {
                if let Err(e) = fs::remove_file(path) {
                    warn!(?path, error = %e, "Failed to delete duplicate");
                    stats.failed += 1;
                } else {
                    info!(duplicate = ?path, kept = ?original, "Deleted duplicate file");
                    stats.deleted += 1;
                }
            }
            None => {
                debug!(?path, hash, "First file with this content");
                index.insert(hash, path.to_path_buf());
            }
        }
    }

    info!("{}", stats.summary());
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_keeps_first_deletes_rest() {
        let dir = TempDir::new().unwrap();
        let a = write_file(dir.path(), "a.jpg", b"same bytes");
        let b = write_file(dir.path(), "b.jpg", b"same bytes");
        let c = write_file(dir.path(), "c.txt", b"same bytes");
        let distinct = write_file(dir.path(), "d.jpg", b"different bytes");

        let stats = eliminate_duplicates(dir.path()).unwrap();

        assert_eq!(stats.scanned, 4);
        assert_eq!(stats.deleted, 2);
        assert_eq!(stats.failed, 0);

        // Sorted traversal order: a.jpg is enumerated first and kept
        assert!(a.exists());
        assert!(!b.exists());
        assert!(!c.exists());
        assert!(distinct.exists());
    }

    #[test]
    fn test_content_based_across_subdirectories() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        let kept = write_file(dir.path(), "a.mp4", b"payload");
        let nested_dup = write_file(&sub, "other-name.bin", b"payload");

        let stats = eliminate_duplicates(dir.path()).unwrap();

        assert_eq!(stats.deleted, 1);
        assert!(kept.exists());
        assert!(!nested_dup.exists());
    }

    #[test]
    fn test_no_duplicates_is_a_noop() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.jpg", b"one");
        write_file(dir.path(), "b.jpg", b"two");

        let stats = eliminate_duplicates(dir.path()).unwrap();
        assert_eq!(stats.scanned, 2);
        assert_eq!(stats.deleted, 0);
    }

    #[test]
    fn test_unreadable_root_aborts() {
        let err = eliminate_duplicates(Path::new("/nonexistent/root")).unwrap_err();
        assert!(matches!(err, Error::UnreadableRoot { .. }));
    }
}
