//! Input file formats.

use std::fmt;
use std::str::FromStr;

/// Layout of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// One opaque value per line.
    List,
    /// A single JSON array of objects spanning the whole file.
    Json,
    /// One JSON object per line.
    JsonLines,
}

impl FileFormat {
    /// Lower-case name, as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::List => "list",
            FileFormat::Json => "json",
            FileFormat::JsonLines => "jsonlines",
        }
    }
}

/// Displays the upper-case label used in progress lines (`LIST`, `JSON`, `JSONLINES`).
impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// Returned when a string does not name a known [`FileFormat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFileFormatError(String);

impl fmt::Display for ParseFileFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown file type '{}' (expected one of: list, json, jsonlines)",
            self.0
        )
    }
}

impl std::error::Error for ParseFileFormatError {}

impl FromStr for FileFormat {
    type Err = ParseFileFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "list" => Ok(FileFormat::List),
            "json" => Ok(FileFormat::Json),
            "jsonlines" | "jsonl" | "ndjson" => Ok(FileFormat::JsonLines),
            _ => Err(ParseFileFormatError(s.to_string())),
        }
    }
}
