//! Source parser configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CLASS_MARKER, DEFAULT_CLASS_PREFIX, DEFAULT_FUNCTION_PREFIX, DEFAULT_MARK_NAMESPACE,
};

/// Naming conventions the parser uses to recognize tests and markers.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParserConfig {
    /// Prefix of test functions and methods. Default: `"test_"`.
    pub function_prefix: Option<String>,
    /// Prefix that makes a class a test class. Default: `"test_"`.
    pub class_prefix: Option<String>,
    /// Substring that makes a class a test class. Default: `"Test"`.
    pub class_marker: Option<String>,
    /// Module whose `.mark` attribute carries markers. Default: `"pytest"`.
    pub mark_namespace: Option<String>,
}

impl ParserConfig {
    pub fn effective_function_prefix(&self) -> &str {
        self.function_prefix.as_deref().unwrap_or(DEFAULT_FUNCTION_PREFIX)
    }

    pub fn effective_class_prefix(&self) -> &str {
        self.class_prefix.as_deref().unwrap_or(DEFAULT_CLASS_PREFIX)
    }

    pub fn effective_class_marker(&self) -> &str {
        self.class_marker.as_deref().unwrap_or(DEFAULT_CLASS_MARKER)
    }

    pub fn effective_mark_namespace(&self) -> &str {
        self.mark_namespace.as_deref().unwrap_or(DEFAULT_MARK_NAMESPACE)
    }
}
