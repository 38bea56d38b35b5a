//! Configuration types for the photo organizer

use std::path::Path;

/// Classification of a media file by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Image files carrying embedded EXIF metadata (jpg, jpeg, heic)
    Image,
    /// Video files with no usable metadata source (mp4, mov)
    Video,
}

/// Configuration for the photo organizer
///
/// An immutable value passed into the classifier and the processing
/// pipelines. There is no configuration file; callers construct it once
/// (usually via `Default`) and hand out shared references.
#[derive(Debug, Clone)]
pub struct Config {
    /// Recognized image extensions (lowercase, without leading dot)
    pub image_extensions: Vec<String>,

    /// Recognized video extensions (lowercase, without leading dot)
    pub video_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_extensions: vec!["jpg".into(), "jpeg".into(), "heic".into()],
            video_extensions: vec!["mp4".into(), "mov".into()],
        }
    }
}

impl Config {
    /// Check if a file extension is a recognized image format
    pub fn is_image(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.image_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Check if a file extension is a recognized video format
    pub fn is_video(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.video_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Classify a path by its extension
    ///
    /// Returns `None` for files without an extension or with an extension
    /// outside the recognized sets; such files are left untouched.
    pub fn classify(&self, path: &Path) -> Option<MediaKind> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        if self.is_image(ext) {
            Some(MediaKind::Image)
        } else if self.is_video(ext) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_classify_images() {
        let config = Config::default();
        assert_eq!(
            config.classify(&PathBuf::from("a/photo.jpg")),
            Some(MediaKind::Image)
        );
        assert_eq!(
            config.classify(&PathBuf::from("photo.JPEG")),
            Some(MediaKind::Image)
        );
        assert_eq!(
            config.classify(&PathBuf::from("photo.HEIC")),
            Some(MediaKind::Image)
        );
    }

    #[test]
    fn test_classify_videos() {
        let config = Config::default();
        assert_eq!(
            config.classify(&PathBuf::from("clip.mp4")),
            Some(MediaKind::Video)
        );
        assert_eq!(
            config.classify(&PathBuf::from("clip.MOV")),
            Some(MediaKind::Video)
        );
    }

    #[test]
    fn test_unclassified() {
        let config = Config::default();
        assert_eq!(config.classify(&PathBuf::from("notes.txt")), None);
        assert_eq!(config.classify(&PathBuf::from("archive.png")), None);
        assert_eq!(config.classify(&PathBuf::from("no_extension")), None);
        // Exact-match against the closed list, not prefix/suffix matching
        assert_eq!(config.classify(&PathBuf::from("clip.mp41")), None);
    }
}
