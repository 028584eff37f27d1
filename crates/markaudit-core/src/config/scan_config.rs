//! Test file discovery configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EXTENSIONS, DEFAULT_FILE_PREFIX, DEFAULT_TEST_DIRS};

/// Configuration for the file locator.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Directories to scan, relative to the root. Default: `["tests"]`.
    /// An explicitly empty list scans the root itself.
    pub test_dirs: Option<Vec<String>>,
    /// File name prefix of test modules. Default: `"test_"`.
    pub file_prefix: Option<String>,
    /// Recognized source extensions, without the dot. Default: `["py"]`.
    pub extensions: Option<Vec<String>>,
    /// Honour `.gitignore` / `.ignore` files. Default: true.
    pub respect_gitignore: Option<bool>,
    /// Glob patterns of paths to skip.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Parser worker threads (0 = one per core). Default: 0.
    pub threads: Option<usize>,
}

impl ScanConfig {
    pub fn effective_test_dirs(&self) -> Vec<String> {
        match &self.test_dirs {
            Some(dirs) => dirs.clone(),
            None => DEFAULT_TEST_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }

    pub fn effective_file_prefix(&self) -> &str {
        self.file_prefix.as_deref().unwrap_or(DEFAULT_FILE_PREFIX)
    }

    pub fn effective_extensions(&self) -> Vec<String> {
        match &self.extensions {
            Some(exts) => exts.iter().map(|e| e.trim_start_matches('.').to_string()).collect(),
            None => DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn effective_respect_gitignore(&self) -> bool {
        self.respect_gitignore.unwrap_or(true)
    }

    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }
}
