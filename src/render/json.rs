//! JSON renderer implementation.

use crate::error::Result;
use crate::model::{BatchSummary, DocumentReport};

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a DocumentReport to JSON.
pub fn to_json(report: &DocumentReport, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(report)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(report)?,
    };
    Ok(json)
}

/// Convert a BatchSummary to JSON.
pub fn summary_to_json(summary: &BatchSummary, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(summary)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(summary)?,
    };
    Ok(json)
}
