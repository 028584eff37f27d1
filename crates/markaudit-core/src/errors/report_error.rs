//! Reporter errors.

use super::error_code::{self, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to serialize {format} report: {message}")]
    Serialization { format: String, message: String },

    #[error("unknown report format: {format}")]
    UnknownFormat { format: String },
}

impl ErrorCode for ReportError {
    fn error_code(&self) -> &'static str {
        error_code::REPORT_ERROR
    }
}
