//! Regex search over entry names and decoded content.

use crate::error::{Error, Result};
use crate::model::MatchLocation;
use regex::Regex;

/// A compiled search pattern.
///
/// The pattern is used as given: matching is case-sensitive unless the
/// pattern itself says otherwise (e.g. `(?i)`).
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
}

impl PatternMatcher {
    /// Compile a search pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    /// Compile an optional search term, treating an empty term as absent.
    pub fn from_term(term: Option<&str>) -> Result<Option<Self>> {
        term.filter(|t| !t.is_empty()).map(Self::new).transpose()
    }

    /// The pattern source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Match an entry by name and by any of its textual renderings.
    ///
    /// `contents` holds every decoded form of the entry that should be
    /// searched; binary entries pass an empty slice and are matched on name
    /// only. Returns `None` when nothing matched.
    pub fn match_entry(&self, name: &str, contents: &[&str]) -> Option<MatchLocation> {
        let by_name = self.is_match(name);
        let by_content = contents.iter().any(|text| self.is_match(text));
        MatchLocation::from_flags(by_name, by_content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pattern() {
        let result = PatternMatcher::new("(unclosed");
        match result {
            Err(Error::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "(unclosed"),
            other => panic!("expected invalid pattern, got {:?}", other),
        }
    }

    #[test]
    fn test_from_term() {
        assert!(PatternMatcher::from_term(None).unwrap().is_none());
        assert!(PatternMatcher::from_term(Some("")).unwrap().is_none());
        let matcher = PatternMatcher::from_term(Some("secret")).unwrap().unwrap();
        assert_eq!(matcher.as_str(), "secret");
        assert!(PatternMatcher::from_term(Some("[")).is_err());
    }

    #[test]
    fn test_case_sensitivity_passes_through() {
        let sensitive = PatternMatcher::new("confidential").unwrap();
        assert!(!sensitive.is_match("Confidential Draft"));

        let insensitive = PatternMatcher::new("(?i)confidential").unwrap();
        assert!(insensitive.is_match("Confidential Draft"));
    }

    #[test]
    fn test_match_entry_locations() {
        let matcher = PatternMatcher::new("image").unwrap();
        assert_eq!(
            matcher.match_entry("image1.png", &[]),
            Some(MatchLocation::Name)
        );
        assert_eq!(
            matcher.match_entry("document.xml", &["an image caption"]),
            Some(MatchLocation::Content)
        );
        assert_eq!(
            matcher.match_entry("image1.xml", &["image"]),
            Some(MatchLocation::Both)
        );
        assert_eq!(matcher.match_entry("styles.xml", &["nothing here"]), None);
    }

    #[test]
    fn test_any_rendering_matches_content() {
        let matcher = PatternMatcher::new("Confidential Draft").unwrap();
        let raw = "<w:t>Confidential</w:t></w:r><w:r><w:t> Draft</w:t>";
        let extracted = "Confidential Draft";
        assert_eq!(matcher.match_entry("document.xml", &[raw]), None);
        assert_eq!(
            matcher.match_entry("document.xml", &[raw, extracted]),
            Some(MatchLocation::Content)
        );
    }
}
