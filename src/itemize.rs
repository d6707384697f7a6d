//! Per-document itemization.
//!
//! [`Itemizer`] walks every entry of one archive, copies it into the
//! `original/` tree and its category subtree, runs signature checks on media,
//! extracts text from content parts and applies the optional search pattern.

use crate::classify::PartClassifier;
use crate::container::{self, OoxmlContainer, CONTENT_TYPES_PART};
use crate::detect;
use crate::error::{Error, Result};
use crate::extract::ContentExtractor;
use crate::model::{
    ArchiveEntry, Category, ContentLocation, Diagnostic, DocumentReport, PatternMatch,
};
use crate::options::ItemizeOptions;
use crate::render::{self, JsonFormat};
use crate::search::PatternMatcher;
use crate::sink::OutputSink;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Verbatim archive structure.
pub const ORIGINAL_DIR: &str = "original";
/// Media entries whose signature disagrees with their extension.
pub const HIDDEN_DIR: &str = "hidden";
/// Entries matched by the search pattern.
pub const MATCHES_DIR: &str = "matches";
/// Search pattern record inside [`MATCHES_DIR`].
pub const SEARCH_TERM_FILE: &str = "search_term.txt";
/// JSON report at the root of the tree.
pub const REPORT_FILE: &str = "report.json";
/// Plain-text log at the root of the tree.
pub const LOG_FILE: &str = "log.txt";

/// Itemizes single documents.
#[derive(Debug, Clone, Default)]
pub struct Itemizer {
    classifier: PartClassifier,
    matcher: Option<PatternMatcher>,
    write_report: bool,
}

impl Itemizer {
    /// Build an itemizer from options.
    ///
    /// Fails with [`Error::InvalidPattern`] if the search term does not compile.
    pub fn new(options: &ItemizeOptions) -> Result<Self> {
        Ok(Self {
            classifier: PartClassifier::new(options.zones.clone()),
            matcher: PatternMatcher::from_term(options.search_term.as_deref())?,
            write_report: options.write_report,
        })
    }

    /// Build an itemizer from ready-made parts. Reports are not written.
    pub fn from_parts(classifier: PartClassifier, matcher: Option<PatternMatcher>) -> Self {
        Self {
            classifier,
            matcher,
            write_report: false,
        }
    }

    /// The search pattern in effect.
    pub fn matcher(&self) -> Option<&PatternMatcher> {
        self.matcher.as_ref()
    }

    /// Itemize a document file.
    pub fn itemize_file(&self, path: &Path, sink: &mut dyn OutputSink) -> Result<DocumentReport> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let data = fs::read(path)?;
        self.itemize_bytes(&name, &data, sink)
    }

    /// Itemize a document held in memory.
    ///
    /// `document` names the document; it is used for the report and for the
    /// verbatim copy written at the root of the tree. Only an unreadable
    /// archive or a failing sink aborts; entry-level problems end up in
    /// [`DocumentReport::diagnostics`].
    pub fn itemize_bytes(
        &self,
        document: &str,
        data: &[u8],
        sink: &mut dyn OutputSink,
    ) -> Result<DocumentReport> {
        let span = tracing::info_span!("itemize", document);
        let _guard = span.enter();

        let mut container = OoxmlContainer::from_bytes(data)
            .map_err(|e| Error::archive_unreadable(document, e))?;
        if !container.exists(CONTENT_TYPES_PART) {
            warn!("{} has no {}", document, CONTENT_TYPES_PART);
        }

        let mut report =
            DocumentReport::new(document, self.matcher.as_ref().map(|m| m.as_str().to_string()));
        report.output_dir = sink.root().map(Path::to_path_buf);

        sink.write(&copy_name(document), data)?;

        // Renamed hidden copies must not land on any entry's own path
        let mut hidden_taken: HashSet<PathBuf> = container
            .list_files()
            .iter()
            .filter_map(|name| ArchiveEntry::new(name, Vec::new()))
            .map(|entry| entry.relative_path())
            .collect();

        for item in container.entries() {
            match item {
                Ok(entry) => self.itemize_entry(&entry, &mut report, &mut hidden_taken, sink)?,
                Err(err) => record_diagnostic(&mut report, err)?,
            }
        }

        if let Some(ref matcher) = self.matcher {
            if !report.matches.is_empty() {
                let path = Path::new(MATCHES_DIR).join(SEARCH_TERM_FILE);
                sink.write(&path, matcher.as_str().as_bytes())?;
            }
        }

        if self.write_report {
            let json = render::to_json(&report, JsonFormat::Pretty)?;
            sink.write(Path::new(REPORT_FILE), json.as_bytes())?;
            sink.write(Path::new(LOG_FILE), render::to_text(&report).as_bytes())?;
        }

        info!(
            entries = report.total_entries(),
            mismatches = report.mismatches.len(),
            matches = report.matches.len(),
            problems = report.diagnostics.len(),
            "itemized {}",
            document
        );
        Ok(report)
    }

    fn itemize_entry(
        &self,
        entry: &ArchiveEntry,
        report: &mut DocumentReport,
        hidden_taken: &mut HashSet<PathBuf>,
        sink: &mut dyn OutputSink,
    ) -> Result<()> {
        let assignment = self.classifier.assign(entry);
        let relative = entry.relative_path();
        debug!(entry = entry.path(), category = %assignment.category, "classified");

        sink.write(&Path::new(ORIGINAL_DIR).join(&relative), entry.data())?;
        let category_dir = assignment.output_dir();
        sink.write(&category_dir.join(&relative), entry.data())?;
        report.record(assignment.category, entry.path());

        let mut extracted = None;
        match (assignment.category, assignment.location) {
            (Category::Media, _) => {
                if let Some(mismatch) = detect::check_signature(entry) {
                    warn!(
                        entry = entry.path(),
                        declared = %mismatch.declared,
                        detected = %mismatch.detected,
                        "media signature mismatch"
                    );
                    let hidden = Path::new(HIDDEN_DIR);
                    sink.write(&hidden.join(&relative), entry.data())?;
                    let renamed =
                        renamed_copy(&relative, mismatch.detected.extension(), hidden_taken);
                    sink.write(&hidden.join(&renamed), entry.data())?;
                    hidden_taken.insert(renamed);
                    report.mismatches.push(mismatch);
                }
            }
            (Category::Content, Some(location)) => {
                match extract_text(entry, location) {
                    Ok(text) => {
                        sink.write(
                            &category_dir.join(relative.with_extension("txt")),
                            text.as_bytes(),
                        )?;
                        extracted = Some(text);
                    }
                    Err(err) => record_diagnostic(report, err)?,
                }
            }
            _ => {}
        }

        if let Some(ref matcher) = self.matcher {
            let decoded = container::decode_text(entry.data());
            if decoded.is_none() {
                report.undecodable.push(entry.path().to_string());
            }
            let contents: Vec<&str> = decoded
                .iter()
                .chain(extracted.iter())
                .map(String::as_str)
                .collect();

            if let Some(location) = matcher.match_entry(entry.name(), &contents) {
                debug!(entry = entry.path(), ?location, "pattern match");
                sink.write(&Path::new(MATCHES_DIR).join(&relative), entry.data())?;
                report.matches.push(PatternMatch {
                    entry: entry.path().to_string(),
                    location,
                });
            }
        }

        Ok(())
    }
}

/// Decode a content part and collect its text.
fn extract_text(entry: &ArchiveEntry, location: ContentLocation) -> Result<String> {
    let xml = container::decode_xml_bytes(entry.data()).map_err(|e| Error::MalformedContent {
        entry: entry.path().to_string(),
        reason: e.to_string(),
    })?;
    ContentExtractor::new(entry.path(), &xml, location).plain_text()
}

/// Record an entry-level error, propagating anything else.
fn record_diagnostic(report: &mut DocumentReport, err: Error) -> Result<()> {
    let diagnostic = Diagnostic::from_entry_error(err)?;
    warn!(entry = %diagnostic.entry, kind = ?diagnostic.kind, "{}", diagnostic.message);
    report.diagnostics.push(diagnostic);
    Ok(())
}

/// Path for the copy of a hidden entry renamed to its detected extension.
///
/// Prefers `image1.png` for `image1.jpg`; if that is taken, falls back to
/// `image1.jpg.png`, then `image1.jpg-2.png` and so on.
fn renamed_copy(relative: &Path, ext: &str, taken: &HashSet<PathBuf>) -> PathBuf {
    let preferred = relative.with_extension(ext);
    if !taken.contains(&preferred) {
        return preferred;
    }
    let name = relative
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    std::iter::once(format!("{}.{}", name, ext))
        .chain((2..).map(|n| format!("{}-{}.{}", name, n, ext)))
        .map(|candidate| relative.with_file_name(candidate))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(preferred)
}

/// File name used for the verbatim document copy.
fn copy_name(document: &str) -> PathBuf {
    Path::new(document)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("document"))
}
