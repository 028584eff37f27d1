//! Report configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_GOOD_THRESHOLD;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Largest uncategorized-function count still rated GOOD. Default: 5.
    pub good_threshold: Option<usize>,
}

impl ReportConfig {
    pub fn effective_good_threshold(&self) -> usize {
        self.good_threshold.unwrap_or(DEFAULT_GOOD_THRESHOLD)
    }
}
