//! # itemizer
//!
//! Forensic itemization of Office Open XML word-processing documents.
//!
//! Every entry of a document archive is copied into an output tree, sorted
//! into a category (XML, CSS, Media, Content, RELS, Uncategorized), checked
//! for media whose binary signature contradicts its extension, and optionally
//! matched against a search pattern.
//!
//! ## Quick Start
//!
//! ```no_run
//! use itemizer::{itemize_path, render, ItemizeOptions};
//!
//! // Itemize one document (or every document in a directory)
//! let options = ItemizeOptions::new().with_search_term("(?i)confidential");
//! let summary = itemize_path("evidence/report.docx", options)?;
//!
//! for report in &summary.reports {
//!     println!("{}", render::to_text(report));
//! }
//! # Ok::<(), itemizer::Error>(())
//! ```
//!
//! ## In-Memory Itemization
//!
//! ```no_run
//! use itemizer::{itemize_bytes, ItemizeOptions, MemorySink};
//!
//! let data = std::fs::read("report.docx")?;
//! let mut sink = MemorySink::new();
//! let report = itemize_bytes("report.docx", &data, &ItemizeOptions::default(), &mut sink)?;
//! println!("Hidden media: {}", report.mismatches.len());
//! # Ok::<(), itemizer::Error>(())
//! ```

pub mod batch;
pub mod classify;
pub mod container;
pub mod detect;
pub mod error;
pub mod extract;
pub mod itemize;
pub mod logging;
pub mod model;
pub mod options;
pub mod render;
pub mod search;
pub mod sink;

// Re-exports
pub use batch::BatchRunner;
pub use classify::{PartClassifier, ZoneRule, ZoneTable};
pub use container::OoxmlContainer;
pub use detect::{check_signature, detect_media_type, MediaType};
pub use error::{Error, Result};
pub use extract::{ContentExtractor, TextFragment};
pub use itemize::Itemizer;
pub use model::{
    ArchiveEntry, Assignment, BatchSummary, Category, ContentLocation, Diagnostic,
    DiagnosticKind, DocumentFailure, DocumentReport, MatchLocation, PatternMatch,
    SignatureMismatch,
};
pub use options::ItemizeOptions;
pub use search::PatternMatcher;
pub use sink::{DirSink, MemorySink, OutputSink};

use std::path::Path;

/// Itemize a document, or every document directly inside a directory.
///
/// Each document gets its own output tree. A document that cannot be opened
/// is recorded in [`BatchSummary::failures`] without stopping the others.
///
/// # Example
///
/// ```no_run
/// use itemizer::{itemize_path, ItemizeOptions};
///
/// let summary = itemize_path("cases/", ItemizeOptions::default())?;
/// println!("{} itemized, {} failed", summary.reports.len(), summary.failures.len());
/// # Ok::<(), itemizer::Error>(())
/// ```
pub fn itemize_path(path: impl AsRef<Path>, options: ItemizeOptions) -> Result<BatchSummary> {
    BatchRunner::new(options)?.run(path.as_ref())
}

/// Itemize a document held in memory into `sink`.
///
/// `document` names the document in the report and for the verbatim copy.
pub fn itemize_bytes(
    document: &str,
    data: &[u8],
    options: &ItemizeOptions,
    sink: &mut dyn OutputSink,
) -> Result<DocumentReport> {
    Itemizer::new(options)?.itemize_bytes(document, data, sink)
}
