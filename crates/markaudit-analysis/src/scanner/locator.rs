//! Test file locator built on the `ignore` walker.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;
use markaudit_core::config::ScanConfig;
use markaudit_core::errors::ScanError;

use super::cancellation::ScanCancellation;
use super::types::LocatedFiles;

/// Enumerates candidate test source files under a set of root directories.
pub struct TestFileLocator {
    file_prefix: String,
    extensions: Vec<String>,
    respect_gitignore: bool,
    exclude: Vec<String>,
    cancellation: ScanCancellation,
}

impl TestFileLocator {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            file_prefix: config.effective_file_prefix().to_string(),
            extensions: config.effective_extensions(),
            respect_gitignore: config.effective_respect_gitignore(),
            exclude: config.exclude.clone(),
            cancellation: ScanCancellation::new(),
        }
    }

    pub fn with_cancellation(mut self, cancellation: ScanCancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Walk every root and return the qualifying files.
    ///
    /// Roots that do not exist are skipped. A root that exists but cannot be
    /// read is fatal: without its file list no partial result is meaningful.
    pub fn locate(&self, root_dirs: &[PathBuf]) -> Result<LocatedFiles, ScanError> {
        let start = Instant::now();
        let mut located = LocatedFiles::default();

        for root in root_dirs {
            if !root.exists() {
                tracing::debug!(root = %root.display(), "test root does not exist, skipping");
                located.skipped_roots.push(root.clone());
                continue;
            }
            check_root_readable(root)?;
            self.walk_root(root, &mut located)?;
        }

        located.files.sort();
        located.files.dedup();

        tracing::debug!(
            files = located.files.len(),
            roots = root_dirs.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "located test files"
        );
        Ok(located)
    }

    fn walk_root(&self, root: &Path, located: &mut LocatedFiles) -> Result<(), ScanError> {
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(self.respect_gitignore)
            .hidden(true)
            .follow_links(false)
            .overrides(self.build_overrides(root)?);

        for result in builder.build() {
            if self.cancellation.is_cancelled() {
                return Err(ScanError::Cancelled);
            }
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(root = %root.display(), error = %err, "skipping unreadable entry");
                    located.errors.push(err.to_string());
                    continue;
                }
            };
            let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
            if is_file && self.qualifies(entry.path()) {
                located.files.push(entry.into_path());
            }
        }
        Ok(())
    }

    fn build_overrides(&self, root: &Path) -> Result<Override, ScanError> {
        let mut builder = OverrideBuilder::new(root);
        for pattern in &self.exclude {
            builder
                .add(&format!("!{pattern}"))
                .map_err(|e| ScanError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
        }
        builder.build().map_err(|e| ScanError::InvalidPattern {
            pattern: self.exclude.join(", "),
            message: e.to_string(),
        })
    }

    fn qualifies(&self, path: &Path) -> bool {
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => is_test_file_name(name, &self.file_prefix, &self.extensions),
            None => false,
        }
    }
}

/// `test_<anything>.<ext>` with a recognized extension.
pub fn is_test_file_name(name: &str, prefix: &str, extensions: &[String]) -> bool {
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return false;
    };
    stem.starts_with(prefix) && extensions.iter().any(|e| e == ext)
}

/// Convenience wrapper: locate with a fresh, never-cancelled handle.
pub fn find_test_files(root_dirs: &[PathBuf], config: &ScanConfig) -> Result<LocatedFiles, ScanError> {
    TestFileLocator::new(config).locate(root_dirs)
}

fn check_root_readable(root: &Path) -> Result<(), ScanError> {
    if !root.is_dir() {
        return Ok(());
    }
    match std::fs::read_dir(root) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => Err(ScanError::PermissionDenied {
            path: root.to_path_buf(),
        }),
        Err(e) => Err(ScanError::IoError {
            path: root.to_path_buf(),
            source: e,
        }),
    }
}
