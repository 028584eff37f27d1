//! Collection oracle: ground-truth test counts from the external runner.
//!
//! The aggregator depends only on [`CollectionOracle`]; tests inject a fake.

pub mod pytest;

use markaudit_core::errors::OracleError;

pub use pytest::{count_collected_lines, PytestOracle};

/// Source of collected-test counts, one query per category plus a total.
pub trait CollectionOracle: Send + Sync {
    /// Tests collected under the `-m <category>` filter.
    fn count_for_category(&self, category: &str) -> Result<u64, OracleError>;

    /// Tests collected with no filter.
    fn total_count(&self) -> Result<u64, OracleError>;
}
