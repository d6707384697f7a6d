//! Findings and per-document reports.

use super::Category;
use crate::detect::MediaType;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A media entry whose extension disagrees with its binary signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureMismatch {
    /// Internal path of the entry
    pub entry: String,
    /// Type implied by the file extension
    pub declared: MediaType,
    /// Type identified from the leading bytes
    pub detected: MediaType,
}

/// Where a search pattern matched an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchLocation {
    /// The entry's file name matched
    Name,
    /// The entry's decoded content matched
    Content,
    /// Both name and content matched
    Both,
}

impl MatchLocation {
    /// Combine name and content outcomes. `None` when neither matched.
    pub fn from_flags(name: bool, content: bool) -> Option<Self> {
        match (name, content) {
            (true, true) => Some(MatchLocation::Both),
            (true, false) => Some(MatchLocation::Name),
            (false, true) => Some(MatchLocation::Content),
            (false, false) => None,
        }
    }

    /// Whether the name matched.
    pub fn by_name(&self) -> bool {
        matches!(self, MatchLocation::Name | MatchLocation::Both)
    }

    /// Whether the content matched.
    pub fn by_content(&self) -> bool {
        matches!(self, MatchLocation::Content | MatchLocation::Both)
    }
}

/// An entry matched by the search pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    /// Internal path of the entry
    pub entry: String,
    /// Where the match occurred
    pub location: MatchLocation,
}

/// Kind of entry-level problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The entry could not be read out of the archive
    EntryReadFailure,
    /// The entry failed XML parsing during text extraction
    MalformedContent,
}

/// An entry-level problem recorded without aborting the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Internal path of the affected entry
    pub entry: String,
    /// What went wrong
    pub kind: DiagnosticKind,
    /// Human-readable detail
    pub message: String,
}

impl Diagnostic {
    /// Convert an entry-level error into a diagnostic.
    ///
    /// Any other error is handed back unchanged so the caller can propagate it.
    pub fn from_entry_error(err: Error) -> std::result::Result<Self, Error> {
        match err {
            Error::EntryRead { entry, reason } => Ok(Self {
                entry,
                kind: DiagnosticKind::EntryReadFailure,
                message: reason,
            }),
            Error::MalformedContent { entry, reason } => Ok(Self {
                entry,
                kind: DiagnosticKind::MalformedContent,
                message: reason,
            }),
            other => Err(other),
        }
    }
}

/// Everything learned about one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Document file name
    pub document: String,

    /// Root of the generated output tree
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Search pattern in effect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,

    /// Entry paths per category, in archive order
    #[serde(default)]
    pub entries: BTreeMap<Category, Vec<String>>,

    /// Media entries with a disagreeing signature
    #[serde(default)]
    pub mismatches: Vec<SignatureMismatch>,

    /// Entries matched by the search pattern
    #[serde(default)]
    pub matches: Vec<PatternMatch>,

    /// Entries excluded from content matching because they are not text
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub undecodable: Vec<String>,

    /// Entry-level problems
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl DocumentReport {
    /// Create an empty report for a document.
    pub fn new(document: impl Into<String>, search_term: Option<String>) -> Self {
        Self {
            document: document.into(),
            search_term,
            ..Default::default()
        }
    }

    /// Record an itemized entry under its category.
    pub fn record(&mut self, category: Category, entry: impl Into<String>) {
        self.entries.entry(category).or_default().push(entry.into());
    }

    /// Number of entries in a category.
    pub fn count(&self, category: Category) -> usize {
        self.entries.get(&category).map_or(0, Vec::len)
    }

    /// Number of itemized entries across all categories.
    pub fn total_entries(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Category an entry was itemized into, if any.
    pub fn category_of(&self, entry: &str) -> Option<Category> {
        self.entries
            .iter()
            .find(|(_, paths)| paths.iter().any(|p| p == entry))
            .map(|(category, _)| *category)
    }

    /// Whether any mismatch or pattern match was found.
    pub fn has_findings(&self) -> bool {
        !self.mismatches.is_empty() || !self.matches.is_empty()
    }

    /// Diagnostics of a given kind.
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}

/// A document that could not be processed at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFailure {
    /// Path of the document
    pub document: PathBuf,
    /// Why it failed
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Reports of successfully processed documents
    pub reports: Vec<DocumentReport>,
    /// Documents that failed as a whole
    pub failures: Vec<DocumentFailure>,
}

impl BatchSummary {
    /// Number of documents attempted.
    pub fn attempted(&self) -> usize {
        self.reports.len() + self.failures.len()
    }

    /// True when no document failed as a whole.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total mismatches across all reports.
    pub fn total_mismatches(&self) -> usize {
        self.reports.iter().map(|r| r.mismatches.len()).sum()
    }

    /// Total pattern matches across all reports.
    pub fn total_matches(&self) -> usize {
        self.reports.iter().map(|r| r.matches.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_location_flags() {
        assert_eq!(MatchLocation::from_flags(true, true), Some(MatchLocation::Both));
        assert_eq!(MatchLocation::from_flags(true, false), Some(MatchLocation::Name));
        assert_eq!(MatchLocation::from_flags(false, true), Some(MatchLocation::Content));
        assert_eq!(MatchLocation::from_flags(false, false), None);
        assert!(MatchLocation::Both.by_name() && MatchLocation::Both.by_content());
        assert!(!MatchLocation::Name.by_content());
    }

    #[test]
    fn test_report_counts() {
        let mut report = DocumentReport::new("a.docx", None);
        report.record(Category::Xml, "[Content_Types].xml");
        report.record(Category::Content, "word/document.xml");
        report.record(Category::Content, "word/header1.xml");

        assert_eq!(report.count(Category::Content), 2);
        assert_eq!(report.count(Category::Media), 0);
        assert_eq!(report.total_entries(), 3);
        assert_eq!(report.category_of("word/header1.xml"), Some(Category::Content));
        assert_eq!(report.category_of("missing.xml"), None);
        assert!(!report.has_findings());
    }

    #[test]
    fn test_diagnostic_from_entry_error() {
        let diag = Diagnostic::from_entry_error(Error::MalformedContent {
            entry: "customXml/item1.xml".to_string(),
            reason: "unclosed element <root>".to_string(),
        })
        .unwrap();
        assert_eq!(diag.kind, DiagnosticKind::MalformedContent);
        assert_eq!(diag.entry, "customXml/item1.xml");

        let passthrough = Diagnostic::from_entry_error(Error::Report("x".to_string()));
        assert!(matches!(passthrough, Err(Error::Report(_))));
    }

    #[test]
    fn test_report_json_roundtrip() {
        let mut report = DocumentReport::new("a.docx", Some("(?i)secret".to_string()));
        report.record(Category::Media, "word/media/image1.jpg");
        report.mismatches.push(SignatureMismatch {
            entry: "word/media/image1.jpg".to_string(),
            declared: MediaType::Jpeg,
            detected: MediaType::Png,
        });

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"Media\""));
        assert!(json.contains("\"declared\":\"JPEG\""));

        let parsed: DocumentReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.mismatches, report.mismatches);
        assert_eq!(parsed.count(Category::Media), 1);
    }

    #[test]
    fn test_batch_summary() {
        let mut summary = BatchSummary::default();
        assert!(summary.is_success());
        summary.reports.push(DocumentReport::new("a.docx", None));
        summary.failures.push(DocumentFailure {
            document: PathBuf::from("b.docx"),
            error: "Archive unreadable".to_string(),
        });
        assert_eq!(summary.attempted(), 2);
        assert!(!summary.is_success());
    }
}
