//! # Bulk Indexer Shared
//!
//! Data types passed between the repository and pipeline crates: the
//! normalized [`Document`], the detected [`FileFormat`] of an input file and
//! the per-document [`BulkOutcome`] returned by the bulk-write API.

mod document;
mod format;
mod outcome;

pub use document::Document;
pub use format::{FileFormat, ParseFileFormatError};
pub use outcome::BulkOutcome;
