//! Scanner data types.

use std::path::PathBuf;

/// Output of test file discovery.
#[derive(Debug, Clone, Default)]
pub struct LocatedFiles {
    /// Qualifying files, sorted lexicographically and deduplicated.
    pub files: Vec<PathBuf>,
    /// Configured roots that do not exist and were skipped.
    pub skipped_roots: Vec<PathBuf>,
    /// Non-fatal errors below a root (e.g. an unreadable subdirectory).
    pub errors: Vec<String>,
}
