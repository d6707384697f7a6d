//! Itemization options configuration.

use crate::classify::ZoneTable;
use std::path::PathBuf;

/// Document extensions picked up by default, all WordprocessingML packages.
pub const DEFAULT_DOCUMENT_EXTENSIONS: &[&str] = &["docx", "docm", "dotx", "dotm"];

/// Options for itemizing documents.
#[derive(Debug, Clone)]
pub struct ItemizeOptions {
    /// Regex matched against entry names and content
    pub search_term: Option<String>,

    /// Directory that receives the generated output trees.
    /// `None` places each tree next to its document.
    pub output_root: Option<PathBuf>,

    /// Content-zone conventions used for classification
    pub zones: ZoneTable,

    /// Extensions (without dot, lower-case) recognized as documents
    pub document_extensions: Vec<String>,

    /// Write `report.json` and `log.txt` into each output tree
    pub write_report: bool,
}

impl Default for ItemizeOptions {
    fn default() -> Self {
        Self {
            search_term: None,
            output_root: None,
            zones: ZoneTable::default(),
            document_extensions: DEFAULT_DOCUMENT_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            write_report: true,
        }
    }
}

impl ItemizeOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search term. An empty term disables searching.
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search_term = (!term.is_empty()).then_some(term);
        self
    }

    /// Place output trees under `root` instead of next to each document.
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = Some(root.into());
        self
    }

    /// Replace the content-zone table.
    pub fn with_zones(mut self, zones: ZoneTable) -> Self {
        self.zones = zones;
        self
    }

    /// Replace the recognized document extensions.
    pub fn with_document_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.document_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Enable or disable `report.json` / `log.txt`.
    pub fn with_report(mut self, enabled: bool) -> Self {
        self.write_report = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ItemizeOptions::default();
        assert!(options.search_term.is_none());
        assert!(options.output_root.is_none());
        assert!(options.write_report);
        assert_eq!(options.document_extensions, vec!["docx", "docm", "dotx", "dotm"]);
    }

    #[test]
    fn test_builder() {
        let options = ItemizeOptions::new()
            .with_search_term("(?i)secret")
            .with_output_root("/tmp/out")
            .with_document_extensions([".DOCX", "xlsx"])
            .with_report(false);

        assert_eq!(options.search_term.as_deref(), Some("(?i)secret"));
        assert_eq!(options.output_root, Some(PathBuf::from("/tmp/out")));
        assert_eq!(options.document_extensions, vec!["docx", "xlsx"]);
        assert!(!options.write_report);
    }

    #[test]
    fn test_empty_search_term_disables_search() {
        let options = ItemizeOptions::new().with_search_term("");
        assert!(options.search_term.is_none());
    }
}
