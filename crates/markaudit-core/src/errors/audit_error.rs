//! Top-level audit errors.

use super::error_code::{self, ErrorCode};
use super::{ConfigError, ReportError, ScanError};

/// Fatal errors of an audit run.
/// Aggregates subsystem errors via `From` conversions.
///
/// Parse and oracle failures never surface here; they are recovered
/// locally and recorded as warnings on the result.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Audit cancelled")]
    Cancelled,
}

impl ErrorCode for AuditError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Scan(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Report(e) => e.error_code(),
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
