//! Index name resolution from file paths.
//!
//! Staged pipeline tooling writes the output of numbered workers to
//! directories such as `in/nuclei-1/`, `in/nuclei-2/`. All of them belong to
//! the same logical index (`nuclei`). Any other path maps to its file name
//! without extension.

use std::path::{Component, Path};

/// Directory segment that precedes the numbered stage directory.
const STAGE_PARENT: &str = "in";

/// Resolve the index name for a file path.
pub fn resolve_index_name(path: &Path) -> String {
    if let Some(stage) = stage_name(path) {
        return stage;
    }

    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Stage name for paths shaped like `.../in/<stage>-<digits>/...`.
///
/// Only the last `in` segment is considered, and the numbered segment must
/// be followed by at least one more segment.
fn stage_name(path: &Path) -> Option<String> {
    let segments: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let last_in = segments.iter().rposition(|s| s == STAGE_PARENT)?;

    // <stage>-<digits> followed by at least one more segment
    if last_in + 2 >= segments.len() {
        return None;
    }

    strip_worker_number(&segments[last_in + 1]).map(str::to_string)
}

/// `"nuclei-12"` → `Some("nuclei")`; `"http-scan-3"` → `Some("http-scan")`.
fn strip_worker_number(segment: &str) -> Option<&str> {
    let (name, number) = segment.rsplit_once('-')?;

    if name.is_empty() || number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(name)
}
