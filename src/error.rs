//! Error types for the itemizer library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for itemizer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while itemizing documents.
///
/// Only a subset of these ever escapes a document run. Entry-level errors
/// (`EntryRead`, `MalformedContent`) are caught by the engine and recorded as
/// diagnostics in the document report.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document is not a readable ZIP archive.
    #[error("Archive unreadable: {document}: {reason}")]
    ArchiveUnreadable { document: String, reason: String },

    /// A single part inside an otherwise valid archive could not be read.
    #[error("Entry unreadable: {entry}: {reason}")]
    EntryRead { entry: String, reason: String },

    /// A content part failed XML parsing.
    #[error("Malformed content in {entry}: {reason}")]
    MalformedContent { entry: String, reason: String },

    /// The search term does not compile as a regular expression.
    #[error("Invalid search pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The input path is neither a file nor a directory.
    #[error("Path is not a file or directory: {}", .0.display())]
    InvalidPath(PathBuf),

    /// The input file does not carry a supported document extension.
    #[error("Not a supported document: {}", .0.display())]
    UnsupportedDocument(PathBuf),

    /// ZIP-level failure not yet attributed to a document or entry.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Invalid configuration data.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error while serializing a report.
    #[error("Report error: {0}")]
    Report(String),
}

impl Error {
    /// Attach a document name to an archive-level failure.
    pub fn archive_unreadable(document: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Error::ArchiveUnreadable {
            document: document.into(),
            reason: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Report(err.to_string())
    }
}
