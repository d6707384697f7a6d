//! Batch processing of a document or a directory of documents.

use crate::error::{Error, Result};
use crate::itemize::Itemizer;
use crate::model::{BatchSummary, DocumentFailure, DocumentReport};
use crate::options::ItemizeOptions;
use crate::sink::DirSink;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Prefix Office uses for owner/lock files next to open documents.
const LOCK_FILE_PREFIX: &str = "~$";

/// Runs the itemizer over every document found at a path.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    itemizer: Itemizer,
    options: ItemizeOptions,
}

impl BatchRunner {
    /// Create a runner.
    ///
    /// The search pattern is compiled here, so an invalid pattern fails
    /// before any document is touched.
    pub fn new(options: ItemizeOptions) -> Result<Self> {
        let itemizer = Itemizer::new(&options)?;
        Ok(Self { itemizer, options })
    }

    /// The options in effect.
    pub fn options(&self) -> &ItemizeOptions {
        &self.options
    }

    /// Whether `path` carries one of the configured document extensions.
    pub fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|ext| self.options.document_extensions.iter().any(|e| *e == ext))
    }

    /// Resolve `path` to the documents to process.
    ///
    /// A file must carry a document extension. A directory is walked
    /// recursively; lock files and earlier `_Itemized(...)` output trees are
    /// skipped and results are sorted by path.
    pub fn discover(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if path.is_file() {
            if !self.is_document(path) {
                return Err(Error::UnsupportedDocument(path.to_path_buf()));
            }
            return Ok(vec![path.to_path_buf()]);
        }

        if !path.is_dir() {
            return Err(Error::InvalidPath(path.to_path_buf()));
        }

        let mut documents = Vec::new();
        let walker = WalkDir::new(path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_output_tree(e));
        for dir_entry in walker {
            let dir_entry = match dir_entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(dir = %path.display(), "skipping unreadable path: {}", err);
                    continue;
                }
            };
            if !dir_entry.file_type().is_file() {
                continue;
            }
            let is_lock_file = dir_entry
                .file_name()
                .to_string_lossy()
                .starts_with(LOCK_FILE_PREFIX);
            if !is_lock_file && self.is_document(dir_entry.path()) {
                documents.push(dir_entry.into_path());
            }
        }
        documents.sort();

        if documents.is_empty() {
            warn!(dir = %path.display(), "no documents found");
        } else {
            debug!(count = documents.len(), dir = %path.display(), "discovered documents");
        }
        Ok(documents)
    }

    /// Process every document at `path`.
    pub fn run(&self, path: &Path) -> Result<BatchSummary> {
        self.run_with(path, |_, _| {})
    }

    /// Process every document at `path`, reporting each outcome as it lands.
    ///
    /// Only discovery errors are returned; a failing document is recorded in
    /// [`BatchSummary::failures`] and the batch moves on.
    pub fn run_with<F>(&self, path: &Path, mut on_document: F) -> Result<BatchSummary>
    where
        F: FnMut(&Path, &Result<DocumentReport>),
    {
        let documents = self.discover(path)?;
        let mut summary = BatchSummary::default();

        for document in documents {
            let outcome = self.process_document(&document);
            on_document(&document, &outcome);
            match outcome {
                Ok(report) => summary.reports.push(report),
                Err(err) => {
                    error!(document = %document.display(), "{}", err);
                    summary.failures.push(DocumentFailure {
                        document,
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            itemized = summary.reports.len(),
            failed = summary.failures.len(),
            "batch complete"
        );
        Ok(summary)
    }

    /// Itemize one document into a freshly named output directory.
    pub fn process_document(&self, document: &Path) -> Result<DocumentReport> {
        let timestamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
        let out_dir = unique_dir(output_dir_for(
            document,
            self.options.output_root.as_deref(),
            &timestamp,
        ));
        info!(document = %document.display(), out = %out_dir.display(), "processing");

        let mut sink = DirSink::new(out_dir);
        self.itemizer.itemize_file(document, &mut sink)
    }
}

/// Marker in the name of every output directory.
const OUTPUT_TREE_MARKER: &str = "_Itemized(";

/// Whether a walked entry is an output tree from an earlier run.
fn is_output_tree(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name().to_string_lossy().contains(OUTPUT_TREE_MARKER)
}

/// Output directory for a document: `<stem>_Itemized(<timestamp>)`.
///
/// Placed under `root` when given, otherwise next to the document.
pub fn output_dir_for(document: &Path, root: Option<&Path>, timestamp: &str) -> PathBuf {
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let parent = root
        .or_else(|| document.parent())
        .unwrap_or_else(|| Path::new(""));
    parent.join(format!("{}{}{})", stem, OUTPUT_TREE_MARKER, timestamp))
}

/// First of `dir`, `dir-2`, `dir-3`, ... that does not exist yet.
fn unique_dir(dir: PathBuf) -> PathBuf {
    if !dir.exists() {
        return dir;
    }
    let base = dir.as_os_str().to_string_lossy().into_owned();
    (2..)
        .map(|n| PathBuf::from(format!("{}-{}", base, n)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(dir)
}
