//! Report rendering.
//!
//! This module renders document reports and batch summaries as JSON
//! (`report.json`) or as the plain-text log shown on the console and
//! written to `log.txt`.
//!
//! # Example
//!
//! ```no_run
//! use itemizer::{render::*, ItemizeOptions};
//!
//! let summary = itemizer::itemize_path("document.docx", ItemizeOptions::default())?;
//! for report in &summary.reports {
//!     println!("{}", to_text(report));
//!     let json = to_json(report, JsonFormat::Pretty)?;
//! }
//! # Ok::<(), itemizer::Error>(())
//! ```

mod json;
mod text;

pub use json::{summary_to_json, to_json, JsonFormat};
pub use text::{summary_to_text, to_text};
