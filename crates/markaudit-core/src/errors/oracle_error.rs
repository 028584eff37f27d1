//! Collection oracle errors.

use super::error_code::{self, ErrorCode};

/// Errors from invoking the external test-collection tool.
///
/// Callers treat every variant as "no information": the count for that
/// query defaults to 0 and the audit continues.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("collection exited with status {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("collection timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("collection process was terminated by a signal")]
    Terminated,

    #[error("oracle IO error: {message}")]
    Io { message: String },

    #[error("oracle command is empty")]
    EmptyCommand,
}

impl ErrorCode for OracleError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => error_code::ORACLE_TIMEOUT,
            _ => error_code::ORACLE_ERROR,
        }
    }
}
