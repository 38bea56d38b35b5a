//! The rename pipeline: traversal, date resolution and renaming
//!
//! For every classified media file the engine picks one authoritative
//! capture date and renames the file in place to the canonical
//! `YYYY-MM-DD HH.MM.SS` stem:
//! - images: EXIF date-taken, else filename pattern, else untouched
//! - videos: filename pattern, else modification time (always renames)
//!
//! Files already carrying a canonical stem are skipped without any
//! metadata read, which makes repeated runs no-ops.

use crate::config::{Config, MediaKind};
use crate::error::{Error, Result};
use crate::naming;
use crate::time::{self, DateSource, ResolvedDate, exif, filename};
use chrono::TimeZone;
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Per-file outcome of one organize pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// File was renamed to its canonical name
    Renamed {
        new_path: PathBuf,
        source: DateSource,
    },
    /// Stem already canonical; nothing to do
    AlreadyCanonical,
    /// No metadata date and no filename date; file left untouched
    NoDate,
    /// Filename date was out of calendar range; file left untouched
    InvalidDate,
    /// Processing failed; file left untouched
    Failed { message: String },
}

/// Report for a single processed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Summary of one organize run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrganizeStats {
    pub renamed: usize,
    pub already_canonical: usize,
    pub no_date: usize,
    pub invalid_date: usize,
    pub failed: usize,
}

impl OrganizeStats {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut stats = Self::default();
        for report in reports {
            match report.outcome {
                Outcome::Renamed { .. } => stats.renamed += 1,
                Outcome::AlreadyCanonical => stats.already_canonical += 1,
                Outcome::NoDate => stats.no_date += 1,
                Outcome::InvalidDate => stats.invalid_date += 1,
                Outcome::Failed { .. } => stats.failed += 1,
            }
        }
        stats
    }

    pub fn summary(&self) -> String {
        format!(
            "Renamed: {}, Already named: {}, No date: {}, Invalid date: {}, Failed: {}",
            self.renamed, self.already_canonical, self.no_date, self.invalid_date, self.failed
        )
    }
}

/// The outcome of date resolution, before any rename happens
enum DateDecision {
    Resolved(ResolvedDate, DateSource),
    NoDate,
    InvalidDate,
}

/// Organizes media files under a root directory
pub struct Organizer {
    config: Config,
}

impl Organizer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the rename pipeline rooted at `root`
    ///
    /// Classified files are collected up front, then processed one by
    /// one, so renames never perturb an in-flight directory listing.
    /// Per-file failures are recorded and do not stop siblings; only an
    /// unreadable root aborts.
    pub fn run(&self, root: &Path) -> Result<Vec<FileReport>> {
        fs::read_dir(root).map_err(|e| Error::UnreadableRoot {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;

        info!(?root, "Scanning for media files");
        let files = self.collect_files(root);
        info!(count = files.len(), "Found media files");

        let mut reports = Vec::with_capacity(files.len());
        for (path, kind) in files {
            let outcome = self.process_file(&path, kind);
            if let Outcome::Failed { ref message } = outcome {
                warn!(?path, message, "Failed to process file");
            }
            reports.push(FileReport { path, outcome });
        }

        info!("{}", OrganizeStats::from_reports(&reports).summary());
        Ok(reports)
    }

    /// Collect classified media files in sorted traversal order.
    /// Unclassified entries are skipped silently; unreadable subtree
    /// entries are logged and skipped.
    fn collect_files(&self, root: &Path) -> Vec<(PathBuf, MediaKind)> {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let path = entry.path().to_path_buf();
                let kind = self.config.classify(&path)?;
                Some((path, kind))
            })
            .collect()
    }

    /// Decide the authoritative date for one file and drive the rename
    fn process_file(&self, path: &Path, kind: MediaKind) -> Outcome {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            return Outcome::Failed {
                message: Error::InvalidFileName {
                    path: path.to_path_buf(),
                }
                .to_string(),
            };
        };

        // Idempotence: correctly named files are not touched at all
        if naming::is_canonical_stem(stem) {
            debug!(?path, "Already canonically named, skipping");
            return Outcome::AlreadyCanonical;
        }

        let decision = match kind {
            MediaKind::Image => self.resolve_image_date(path),
            MediaKind::Video => self.resolve_video_date(path),
        };

        let (date, source) = match decision {
            Ok(DateDecision::Resolved(date, source)) => (date, source),
            Ok(DateDecision::NoDate) => {
                info!(?path, "No date found, leaving file untouched");
                return Outcome::NoDate;
            }
            Ok(DateDecision::InvalidDate) => {
                info!(?path, "Invalid date in filename, leaving file untouched");
                return Outcome::InvalidDate;
            }
            Err(e) => {
                return Outcome::Failed {
                    message: e.to_string(),
                };
            }
        };

        // A filename-derived date becomes the file's metadata truth:
        // written into EXIF for images and mirrored into mtime for both
        // kinds, so canonical name, metadata and mtime stay consistent.
        if source == DateSource::Filename {
            if kind == MediaKind::Image {
                if let Err(e) = exif::write_date_taken(path, &date) {
                    warn!(?path, error = %e, "Could not write EXIF date, renaming anyway");
                }
            }
            retime(path, &date);
        }

        self.rename_to_canonical(path, &date, source)
    }

    /// Image policy: EXIF date-taken first, then filename, else nothing
    fn resolve_image_date(&self, path: &Path) -> Result<DateDecision> {
        if let Some(date) = exif::read_date_taken(path)? {
            debug!(?path, %date, "Resolved date from EXIF");
            return Ok(DateDecision::Resolved(date, DateSource::Exif));
        }

        let Some(parsed) = filename_date(path) else {
            return Ok(DateDecision::NoDate);
        };
        match parsed.to_datetime() {
            Some(date) => {
                debug!(?path, %date, "Resolved date from filename");
                Ok(DateDecision::Resolved(date, DateSource::Filename))
            }
            None => Ok(DateDecision::InvalidDate),
        }
    }

    /// Video policy: filename first, modification time as the guaranteed
    /// fallback. Videos never dead-end in "no date".
    fn resolve_video_date(&self, path: &Path) -> Result<DateDecision> {
        if let Some(date) = filename_date(path).and_then(|parsed| parsed.to_datetime()) {
            debug!(?path, %date, "Resolved date from filename");
            return Ok(DateDecision::Resolved(date, DateSource::Filename));
        }

        let date = time::read_mtime(path)?;
        debug!(?path, %date, "Resolved date from modification time");
        Ok(DateDecision::Resolved(date, DateSource::Mtime))
    }

    /// Build the unique canonical name and perform the rename
    fn rename_to_canonical(
        &self,
        path: &Path,
        date: &ResolvedDate,
        source: DateSource,
    ) -> Outcome {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();

        let stem = naming::format_stem(date);
        let unique = match naming::unique_stem(dir, &stem, &ext) {
            Ok(unique) => unique,
            Err(e) => {
                return Outcome::Failed {
                    message: e.to_string(),
                };
            }
        };

        let new_path = dir.join(format!("{unique}{ext}"));
        if let Err(e) = fs::rename(path, &new_path) {
            return Outcome::Failed {
                message: Error::Rename {
                    from: path.to_path_buf(),
                    to: new_path,
                    message: e.to_string(),
                }
                .to_string(),
            };
        }

        info!(from = ?path, to = ?new_path, ?source, "Renamed file");
        Outcome::Renamed { new_path, source }
    }
}

fn filename_date(path: &Path) -> Option<filename::FilenameDate> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(filename::parse_filename_date)
}

/// Set the file's modification time to the resolved date.
/// Failure only costs mtime consistency, so it never stops the rename.
fn retime(path: &Path, date: &ResolvedDate) {
    let local = match chrono::Local.from_local_datetime(date) {
        chrono::LocalResult::Single(local) => local,
        chrono::LocalResult::Ambiguous(earliest, _) => earliest,
        chrono::LocalResult::None => {
            warn!(?path, %date, "Date does not exist in local time, keeping mtime");
            return;
        }
    };

    let file_time = FileTime::from_system_time(local.into());
    if let Err(e) = filetime::set_file_mtime(path, file_time) {
        warn!(?path, error = %e, "Failed to update modification time");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn organizer() -> Organizer {
        Organizer::new(Config::default())
    }

    fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn write_jpeg(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xD9]).unwrap();
        path
    }

    fn write_video(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    fn set_mtime(path: &Path, date: &NaiveDateTime) {
        retime(path, date);
    }

    #[test]
    fn test_idempotence() {
        let dir = TempDir::new().unwrap();
        let path = write_jpeg(dir.path(), "2023-05-02 14.00.00.jpg");
        let before = fs::read(&path).unwrap();

        let reports = organizer().run(dir.path()).unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].outcome, Outcome::AlreadyCanonical);
        assert!(path.exists());
        // No metadata write happened either
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_collision_suffixed_name_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = write_jpeg(dir.path(), "2023-05-02 14.00.00_1.jpg");

        let reports = organizer().run(dir.path()).unwrap();
        assert_eq!(reports[0].outcome, Outcome::AlreadyCanonical);
        assert!(path.exists());
    }

    #[test]
    fn test_image_exif_beats_filename() {
        let dir = TempDir::new().unwrap();
        let path = write_jpeg(dir.path(), "IMG_20230502_143015.jpg");
        exif::write_date_taken(&path, &datetime(2022, 3, 4, 5, 6, 7)).unwrap();

        let reports = organizer().run(dir.path()).unwrap();

        match &reports[0].outcome {
            Outcome::Renamed { new_path, source } => {
                assert_eq!(*source, DateSource::Exif);
                assert_eq!(
                    new_path.file_name().unwrap().to_str().unwrap(),
                    "2022-03-04 05.06.07.jpg"
                );
                assert!(new_path.exists());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_image_filename_fallback_writes_exif_and_mtime() {
        let dir = TempDir::new().unwrap();
        write_jpeg(dir.path(), "IMG_20230502_143015.jpg");

        let reports = organizer().run(dir.path()).unwrap();

        let new_path = match &reports[0].outcome {
            Outcome::Renamed { new_path, source } => {
                assert_eq!(*source, DateSource::Filename);
                new_path.clone()
            }
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert_eq!(
            new_path.file_name().unwrap().to_str().unwrap(),
            "2023-05-02 14.30.15.jpg"
        );

        // The filename-derived date became the metadata truth
        let expected = datetime(2023, 5, 2, 14, 30, 15);
        assert_eq!(exif::read_date_taken(&new_path).unwrap(), Some(expected));
        assert_eq!(time::read_mtime(&new_path).unwrap(), expected);
    }

    #[test]
    fn test_image_without_any_date_is_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write_jpeg(dir.path(), "holiday.jpg");

        let reports = organizer().run(dir.path()).unwrap();
        assert_eq!(reports[0].outcome, Outcome::NoDate);
        assert!(path.exists());
    }

    #[test]
    fn test_invalid_filename_date_is_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write_jpeg(dir.path(), "20231345_000000.jpg");

        let reports = organizer().run(dir.path()).unwrap();
        assert_eq!(reports[0].outcome, Outcome::InvalidDate);
        assert!(path.exists());
    }

    #[test]
    fn test_video_filename_beats_mtime() {
        let dir = TempDir::new().unwrap();
        let path = write_video(dir.path(), "VID_20230502_143015.mp4", b"video");
        set_mtime(&path, &datetime(2019, 1, 1, 0, 0, 0));

        let reports = organizer().run(dir.path()).unwrap();

        match &reports[0].outcome {
            Outcome::Renamed { new_path, source } => {
                assert_eq!(*source, DateSource::Filename);
                assert_eq!(
                    new_path.file_name().unwrap().to_str().unwrap(),
                    "2023-05-02 14.30.15.mp4"
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_video_mtime_fallback() {
        let dir = TempDir::new().unwrap();
        let path = write_video(dir.path(), "clip.mp4", b"video");
        set_mtime(&path, &datetime(2021, 7, 15, 8, 30, 0));

        let reports = organizer().run(dir.path()).unwrap();

        match &reports[0].outcome {
            Outcome::Renamed { new_path, source } => {
                assert_eq!(*source, DateSource::Mtime);
                assert_eq!(
                    new_path.file_name().unwrap().to_str().unwrap(),
                    "2021-07-15 08.30.00.mp4"
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_collision_gets_numeric_suffix() {
        let dir = TempDir::new().unwrap();
        // Both resolve to the same stem; '-' sorts before '_', so the
        // dashed name is processed first and takes the base stem
        write_video(dir.path(), "VID-20230502-140000.mp4", b"first");
        write_video(dir.path(), "VID_20230502_140000.mp4", b"second");

        organizer().run(dir.path()).unwrap();

        assert!(dir.path().join("2023-05-02 14.00.00.mp4").exists());
        assert!(dir.path().join("2023-05-02 14.00.00_1.mp4").exists());
    }

    #[test]
    fn test_unclassified_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        let notes = dir.path().join("20230502_notes.txt");
        fs::write(&notes, b"text").unwrap();

        let reports = organizer().run(dir.path()).unwrap();
        assert!(reports.is_empty());
        assert!(notes.exists());
    }

    #[test]
    fn test_recurses_into_subdirectories() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("trip");
        fs::create_dir(&sub).unwrap();
        write_video(&sub, "VID_20230502_140000.mp4", b"video");

        let reports = organizer().run(dir.path()).unwrap();
        assert_eq!(reports.len(), 1);
        assert!(sub.join("2023-05-02 14.00.00.mp4").exists());
    }

    #[test]
    fn test_unreadable_root_aborts() {
        let err = organizer().run(Path::new("/nonexistent/root")).unwrap_err();
        assert!(matches!(err, Error::UnreadableRoot { .. }));
    }

    #[test]
    fn test_stats_from_reports() {
        let dir = TempDir::new().unwrap();
        write_jpeg(dir.path(), "2023-05-02 14.00.00.jpg");
        write_jpeg(dir.path(), "holiday.jpg");
        write_jpeg(dir.path(), "IMG_20230502_143015.jpg");

        let reports = organizer().run(dir.path()).unwrap();
        let stats = OrganizeStats::from_reports(&reports);

        assert_eq!(stats.renamed, 1);
        assert_eq!(stats.already_canonical, 1);
        assert_eq!(stats.no_date, 1);
        assert_eq!(stats.failed, 0);
    }
}
