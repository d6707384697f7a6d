//! Data model for itemized documents.
//!
//! Entries read from an archive, the categories they are sorted into, and
//! the findings collected into a per-document report.

mod category;
mod entry;
mod report;

pub use category::*;
pub use entry::*;
pub use report::*;
