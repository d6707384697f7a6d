//! Output destinations for itemized files.
//!
//! The engine never touches the filesystem directly; it writes relative paths
//! into an [`OutputSink`]. [`DirSink`] materializes them under a directory,
//! [`MemorySink`] keeps them in memory.

use crate::error::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Destination for the files of one document's output tree.
pub trait OutputSink {
    /// Write `data` at `path`, relative to the sink's root.
    fn write(&mut self, path: &Path, data: &[u8]) -> Result<()>;

    /// Filesystem root of the tree, if there is one.
    fn root(&self) -> Option<&Path> {
        None
    }
}

/// Writes files beneath a root directory.
///
/// Nothing is created until the first write, so a document that fails before
/// producing output leaves no directory behind.
#[derive(Debug, Clone)]
pub struct DirSink {
    root: PathBuf,
}

impl DirSink {
    /// Create a sink rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl OutputSink for DirSink {
    fn write(&mut self, path: &Path, data: &[u8]) -> Result<()> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, data)?;
        Ok(())
    }

    fn root(&self) -> Option<&Path> {
        Some(&self.root)
    }
}

/// Keeps written files in memory, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Content written at `path`.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        self.files.get(path.as_ref()).map(Vec::as_slice)
    }

    /// Whether a file was written at `path`.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.files.contains_key(path.as_ref())
    }

    /// Whether any file was written beneath directory `dir`.
    pub fn has_dir(&self, dir: impl AsRef<Path>) -> bool {
        let dir = dir.as_ref();
        self.files.keys().any(|p| p.starts_with(dir) && p != dir)
    }

    /// Files written beneath directory `dir`.
    pub fn files_under(&self, dir: impl AsRef<Path>) -> Vec<&Path> {
        let dir = dir.as_ref();
        self.files
            .keys()
            .filter(|p| p.starts_with(dir))
            .map(PathBuf::as_path)
            .collect()
    }

    /// All written paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    /// Number of files written.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing was written.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, path: &Path, data: &[u8]) -> Result<()> {
        self.files.insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }
}
