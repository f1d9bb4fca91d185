//! Helpers for keeping user text out of span attributes and file names.
//!
//! Job names are free text typed on site and may contain customer or
//! project names; spans only ever see a short hash of them.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Returns only the filename component of a path (no directory).
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Short deterministic hash of a job name, for correlating log lines.
pub fn hash_name(name: &str) -> String {
    let mut hasher = DefaultHasher::new();
    name.trim().hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Makes a job name usable as a file name.
///
/// Spaces become `_`, path separators and characters rejected by common
/// file systems are dropped. An empty result becomes `job`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "job".to_string()
    } else {
        cleaned.to_string()
    }
}
