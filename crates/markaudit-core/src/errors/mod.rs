//! Error handling for markaudit.
//! One error enum per subsystem, `thiserror` only.

pub mod audit_error;
pub mod config_error;
pub mod error_code;
pub mod oracle_error;
pub mod parse_error;
pub mod report_error;
pub mod scan_error;

pub use audit_error::AuditError;
pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use oracle_error::OracleError;
pub use parse_error::ParseError;
pub use report_error::ReportError;
pub use scan_error::ScanError;
