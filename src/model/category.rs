//! Part categories and content locations.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The bucket every archive entry is itemized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Generic XML parts
    #[serde(rename = "XML")]
    Xml,
    /// Stylesheets
    #[serde(rename = "CSS")]
    Css,
    /// Images, audio and video
    Media,
    /// XML parts holding body text (document, headers, footers, ...)
    Content,
    /// Relationship parts
    #[serde(rename = "RELS")]
    Rels,
    /// Everything else
    Uncategorized,
}

impl Category {
    /// All categories in output order.
    pub const ALL: [Category; 6] = [
        Category::Xml,
        Category::Css,
        Category::Media,
        Category::Content,
        Category::Rels,
        Category::Uncategorized,
    ];

    /// Name of the category's output subtree.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Xml => "XML",
            Category::Css => "CSS",
            Category::Media => "Media",
            Category::Content => "Content",
            Category::Rels => "RELS",
            Category::Uncategorized => "Uncategorized",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// Structural zone a piece of extracted text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentLocation {
    /// Main document body
    Document,
    /// Page headers
    Header,
    /// Page footers
    Footer,
    /// Footnotes
    Footnotes,
    /// Endnotes
    Endnotes,
    /// Reviewer comments
    Comments,
    /// Glossary document (building blocks)
    Glossary,
    /// Custom XML data items
    Custom,
}

impl ContentLocation {
    /// Lower-case label, also used as the output directory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentLocation::Document => "document",
            ContentLocation::Header => "header",
            ContentLocation::Footer => "footer",
            ContentLocation::Footnotes => "footnotes",
            ContentLocation::Endnotes => "endnotes",
            ContentLocation::Comments => "comments",
            ContentLocation::Glossary => "glossary",
            ContentLocation::Custom => "custom",
        }
    }
}

impl std::fmt::Display for ContentLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of classifying one entry.
///
/// `location` is set exactly when `category` is [`Category::Content`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub category: Category,
    pub location: Option<ContentLocation>,
}

impl Assignment {
    /// An assignment to a non-content category.
    pub fn plain(category: Category) -> Self {
        Self {
            category,
            location: None,
        }
    }

    /// An assignment to the content category at the given location.
    pub fn content(location: ContentLocation) -> Self {
        Self {
            category: Category::Content,
            location: Some(location),
        }
    }

    /// Output subtree for this assignment, e.g. `Content/header` or `XML`.
    pub fn output_dir(&self) -> PathBuf {
        let mut dir = PathBuf::from(self.category.dir_name());
        if let Some(location) = self.location {
            dir.push(location.as_str());
        }
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names_unique() {
        let mut names: Vec<_> = Category::ALL.iter().map(|c| c.dir_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Category::ALL.len());
    }

    #[test]
    fn test_category_serde_names() {
        assert_eq!(serde_json::to_string(&Category::Xml).unwrap(), "\"XML\"");
        assert_eq!(serde_json::to_string(&Category::Rels).unwrap(), "\"RELS\"");
        assert_eq!(
            serde_json::to_string(&Category::Uncategorized).unwrap(),
            "\"Uncategorized\""
        );
        assert_eq!(
            serde_json::to_string(&ContentLocation::Header).unwrap(),
            "\"header\""
        );
    }

    #[test]
    fn test_output_dir() {
        assert_eq!(
            Assignment::content(ContentLocation::Footer).output_dir(),
            PathBuf::from("Content").join("footer")
        );
        assert_eq!(
            Assignment::plain(Category::Media).output_dir(),
            PathBuf::from("Media")
        );
    }
}
