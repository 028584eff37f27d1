//! ErrorCode trait for stable, machine-greppable failure lines.

/// Every error enum implements this to provide a structured error code
/// string. The CLI prints `[ERROR_CODE] message` on fatal failures.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "SCAN_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn tagged(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const ORACLE_ERROR: &str = "ORACLE_ERROR";
pub const ORACLE_TIMEOUT: &str = "ORACLE_TIMEOUT";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const REPORT_ERROR: &str = "REPORT_ERROR";
pub const CANCELLED: &str = "CANCELLED";
