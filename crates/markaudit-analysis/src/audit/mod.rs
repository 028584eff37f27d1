//! Audit aggregator: suite-wide totals, categorization split, oracle cross-check.

pub mod aggregator;
pub mod types;

pub use aggregator::Auditor;
pub use types::{
    AuditIssue, AuditResult, AuditWarning, CountSource, OracleCounts, TestFile, TestFunction,
    Verdict,
};
