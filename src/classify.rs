//! Part classification.
//!
//! Every archive entry is assigned exactly one [`Category`]. Which XML parts
//! count as textual content is decided by a [`ZoneTable`], a plain list of
//! path conventions that can be replaced or loaded from JSON.

use crate::detect::MediaType;
use crate::error::{Error, Result};
use crate::model::{ArchiveEntry, Assignment, Category, ContentLocation};
use serde::{Deserialize, Serialize};

/// Directory name that holds relationship parts.
pub const RELS_DIR: &str = "_rels";

/// One content-zone convention.
///
/// Matches XML parts whose parent directory equals `dir` and whose file stem
/// equals `stem`, or, when `numbered` is set, `stem` followed by digits only
/// (`header`, `header1`, `header12`). Comparison ignores ASCII case since
/// OPC part names are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRule {
    pub dir: String,
    pub stem: String,
    #[serde(default)]
    pub numbered: bool,
    pub location: ContentLocation,
}

impl ZoneRule {
    /// A rule matching exactly `dir/stem.xml`.
    pub fn exact(dir: &str, stem: &str, location: ContentLocation) -> Self {
        Self {
            dir: dir.to_string(),
            stem: stem.to_string(),
            numbered: false,
            location,
        }
    }

    /// A rule matching `dir/stemN.xml` for any (possibly empty) number N.
    pub fn numbered(dir: &str, stem: &str, location: ContentLocation) -> Self {
        Self {
            numbered: true,
            ..Self::exact(dir, stem, location)
        }
    }

    fn matches(&self, entry: &ArchiveEntry) -> bool {
        if !entry.parent().eq_ignore_ascii_case(&self.dir) {
            return false;
        }

        let stem = entry.stem();
        if stem.eq_ignore_ascii_case(&self.stem) {
            return true;
        }

        self.numbered
            && stem.len() > self.stem.len()
            && stem.is_char_boundary(self.stem.len())
            && stem[..self.stem.len()].eq_ignore_ascii_case(&self.stem)
            && stem[self.stem.len()..].bytes().all(|b| b.is_ascii_digit())
    }
}

/// Ordered set of content-zone rules. The first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneTable {
    rules: Vec<ZoneRule>,
}

impl Default for ZoneTable {
    /// Standard WordprocessingML layout.
    fn default() -> Self {
        Self::new(vec![
            ZoneRule::exact("word", "document", ContentLocation::Document),
            ZoneRule::numbered("word", "header", ContentLocation::Header),
            ZoneRule::numbered("word", "footer", ContentLocation::Footer),
            ZoneRule::exact("word", "footnotes", ContentLocation::Footnotes),
            ZoneRule::exact("word", "endnotes", ContentLocation::Endnotes),
            ZoneRule::exact("word", "comments", ContentLocation::Comments),
            ZoneRule::exact("word/glossary", "document", ContentLocation::Glossary),
            ZoneRule::numbered("customXml", "item", ContentLocation::Custom),
        ])
    }
}

impl ZoneTable {
    /// Create a table from explicit rules.
    pub fn new(rules: Vec<ZoneRule>) -> Self {
        Self { rules }
    }

    /// Load a table from a JSON array of rules.
    ///
    /// ```
    /// use itemizer::classify::ZoneTable;
    ///
    /// let table = ZoneTable::from_json(
    ///     r#"[{"dir": "ppt/slides", "stem": "slide", "numbered": true, "location": "document"}]"#,
    /// )?;
    /// assert_eq!(table.rules().len(), 1);
    /// # Ok::<(), itemizer::Error>(())
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[ZoneRule] {
        &self.rules
    }

    /// Content location of an entry, if it lies in a content zone.
    ///
    /// Only `.xml` parts can be content.
    pub fn locate(&self, entry: &ArchiveEntry) -> Option<ContentLocation> {
        if entry.extension().as_deref() != Some("xml") {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.matches(entry))
            .map(|rule| rule.location)
    }
}

/// Assigns archive entries to categories.
#[derive(Debug, Clone, Default)]
pub struct PartClassifier {
    zones: ZoneTable,
}

impl PartClassifier {
    /// Create a classifier with a custom zone table.
    pub fn new(zones: ZoneTable) -> Self {
        Self { zones }
    }

    /// Zone table in use.
    pub fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    /// Classify an entry, including its content location when applicable.
    ///
    /// Content zones take precedence over the generic `.xml` rule; relationship
    /// parts are recognized by extension or by living under `_rels/`.
    pub fn assign(&self, entry: &ArchiveEntry) -> Assignment {
        if let Some(location) = self.zones.locate(entry) {
            return Assignment::content(location);
        }

        let category = match entry.extension().as_deref() {
            Some("xml") => Category::Xml,
            Some("css") => Category::Css,
            Some(ext) if MediaType::from_extension(ext).is_some() => Category::Media,
            Some("rels") => Category::Rels,
            _ if in_rels_dir(entry) => Category::Rels,
            _ => Category::Uncategorized,
        };
        Assignment::plain(category)
    }

    /// Category of an entry.
    pub fn classify(&self, entry: &ArchiveEntry) -> Category {
        self.assign(entry).category
    }
}

fn in_rels_dir(entry: &ArchiveEntry) -> bool {
    let segments = entry.segments();
    segments[..segments.len() - 1]
        .iter()
        .any(|s| s.eq_ignore_ascii_case(RELS_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str) -> ArchiveEntry {
        ArchiveEntry::new(path, Vec::new()).unwrap()
    }

    #[test]
    fn test_classification_table() {
        let classifier = PartClassifier::default();
        let cases = [
            ("[Content_Types].xml", Category::Xml),
            ("word/styles.xml", Category::Xml),
            ("word/settings.xml", Category::Xml),
            ("word/theme/theme1.xml", Category::Xml),
            ("docProps/core.xml", Category::Xml),
            ("customXml/itemProps1.xml", Category::Xml),
            ("word/document.xml", Category::Content),
            ("word/header1.xml", Category::Content),
            ("word/footer2.xml", Category::Content),
            ("word/footnotes.xml", Category::Content),
            ("word/endnotes.xml", Category::Content),
            ("word/comments.xml", Category::Content),
            ("word/glossary/document.xml", Category::Content),
            ("customXml/item1.xml", Category::Content),
            ("word/web.css", Category::Css),
            ("word/media/image1.jpeg", Category::Media),
            ("word/media/image2.PNG", Category::Media),
            ("word/media/clip.mp4", Category::Media),
            ("word/media/image3.emf", Category::Media),
            ("_rels/.rels", Category::Rels),
            ("word/_rels/document.xml.rels", Category::Rels),
            ("customXml/_rels/item1.xml.rels", Category::Rels),
            ("_rels/extra", Category::Rels),
            ("word/vbaProject.bin", Category::Uncategorized),
            ("word/embeddings/oleObject1.bin", Category::Uncategorized),
            ("mimetype", Category::Uncategorized),
            ("word/media/image4", Category::Uncategorized),
        ];
        for (path, expected) in cases {
            assert_eq!(classifier.classify(&entry(path)), expected, "path {}", path);
        }
    }

    #[test]
    fn test_classification_deterministic() {
        let classifier = PartClassifier::default();
        let e = entry("word/header3.xml");
        let first = classifier.assign(&e);
        for _ in 0..10 {
            assert_eq!(classifier.assign(&e), first);
        }
    }

    #[test]
    fn test_content_locations() {
        let zones = ZoneTable::default();
        let cases = [
            ("word/document.xml", Some(ContentLocation::Document)),
            ("WORD/Header.xml", Some(ContentLocation::Header)),
            ("word/header12.xml", Some(ContentLocation::Header)),
            ("word/footer1.xml", Some(ContentLocation::Footer)),
            ("word/glossary/document.xml", Some(ContentLocation::Glossary)),
            ("customXml/item2.xml", Some(ContentLocation::Custom)),
            ("word/headerx.xml", None),
            ("word/documents.xml", None),
            ("word/sub/document.xml", None),
            ("word/document.xml.rels", None),
            ("customXml/itemProps2.xml", None),
        ];
        for (path, expected) in cases {
            assert_eq!(zones.locate(&entry(path)), expected, "path {}", path);
        }
    }

    #[test]
    fn test_assignment_carries_location() {
        let classifier = PartClassifier::default();
        let assignment = classifier.assign(&entry("word/footer1.xml"));
        assert_eq!(assignment.category, Category::Content);
        assert_eq!(assignment.location, Some(ContentLocation::Footer));

        let assignment = classifier.assign(&entry("word/styles.xml"));
        assert_eq!(assignment.location, None);
    }

    #[test]
    fn test_custom_zone_table() {
        let zones = ZoneTable::from_json(
            r#"[
                {"dir": "ppt/slides", "stem": "slide", "numbered": true, "location": "document"},
                {"dir": "ppt/notesSlides", "stem": "notesSlide", "numbered": true, "location": "comments"}
            ]"#,
        )
        .unwrap();
        let classifier = PartClassifier::new(zones);

        assert_eq!(
            classifier.assign(&entry("ppt/slides/slide3.xml")),
            Assignment::content(ContentLocation::Document)
        );
        assert_eq!(
            classifier.assign(&entry("ppt/notesSlides/notesSlide1.xml")),
            Assignment::content(ContentLocation::Comments)
        );
        // The default word zones are no longer content
        assert_eq!(classifier.classify(&entry("word/document.xml")), Category::Xml);
    }

    #[test]
    fn test_invalid_zone_json() {
        let result = ZoneTable::from_json(r#"[{"dir": "word"}]"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
