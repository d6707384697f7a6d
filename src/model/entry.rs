//! Archive entry model.

use std::path::PathBuf;

/// A single part read out of a document archive.
///
/// The internal path is stored as sanitized segments: empty, `.` and `..`
/// segments are dropped so the entry can always be materialized beneath an
/// output directory without escaping it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    segments: Vec<String>,
    path: String,
    data: Vec<u8>,
}

impl ArchiveEntry {
    /// Create an entry from its raw archive name and content.
    ///
    /// Returns `None` when the name has no usable segments left after
    /// sanitization.
    pub fn new(raw_name: &str, data: Vec<u8>) -> Option<Self> {
        let segments: Vec<String> = raw_name
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != "." && *s != "..")
            .map(String::from)
            .collect();

        if segments.is_empty() {
            return None;
        }

        let path = segments.join("/");
        Some(Self {
            segments,
            path,
            data,
        })
    }

    /// Path segments in order, directories first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Internal path joined with `/` (e.g. `word/media/image1.png`).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The final path segment.
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// The directory portion of the path, empty for root-level entries.
    pub fn parent(&self) -> String {
        self.segments[..self.segments.len() - 1].join("/")
    }

    /// File name without its extension.
    ///
    /// A leading-dot name such as `.rels` has an empty stem.
    pub fn stem(&self) -> &str {
        let name = self.name();
        match name.rsplit_once('.') {
            Some((stem, ext)) if !ext.is_empty() => stem,
            _ => name,
        }
    }

    /// Declared extension, lower-cased, without the dot.
    pub fn extension(&self) -> Option<String> {
        match self.name().rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => Some(ext.to_ascii_lowercase()),
            _ => None,
        }
    }

    /// Raw byte content.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size of the content in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The internal path as a relative filesystem path.
    pub fn relative_path(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_path_parts() {
        let entry = ArchiveEntry::new("word/media/image1.JPG", vec![1, 2, 3]).unwrap();
        assert_eq!(entry.path(), "word/media/image1.JPG");
        assert_eq!(entry.name(), "image1.JPG");
        assert_eq!(entry.parent(), "word/media");
        assert_eq!(entry.stem(), "image1");
        assert_eq!(entry.extension(), Some("jpg".to_string()));
        assert_eq!(entry.size(), 3);
        assert_eq!(
            entry.relative_path(),
            ["word", "media", "image1.JPG"].iter().collect::<PathBuf>()
        );
    }

    #[test]
    fn test_dot_rels_extension() {
        let entry = ArchiveEntry::new("_rels/.rels", vec![]).unwrap();
        assert_eq!(entry.extension(), Some("rels".to_string()));
        assert_eq!(entry.stem(), "");
        assert_eq!(entry.parent(), "_rels");
    }

    #[test]
    fn test_no_extension() {
        let entry = ArchiveEntry::new("mimetype", vec![]).unwrap();
        assert_eq!(entry.extension(), None);
        assert_eq!(entry.stem(), "mimetype");
        assert_eq!(entry.parent(), "");

        let trailing = ArchiveEntry::new("word/odd.", vec![]).unwrap();
        assert_eq!(trailing.extension(), None);
    }

    #[test]
    fn test_path_sanitization() {
        let entry = ArchiveEntry::new("../../etc/./passwd", vec![]).unwrap();
        assert_eq!(entry.path(), "etc/passwd");

        let entry = ArchiveEntry::new("word\\document.xml", vec![]).unwrap();
        assert_eq!(entry.path(), "word/document.xml");

        assert!(ArchiveEntry::new("../..", vec![]).is_none());
        assert!(ArchiveEntry::new("", vec![]).is_none());
    }
}
