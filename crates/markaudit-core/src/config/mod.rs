//! Configuration system for markaudit.
//! TOML-based, layered resolution: CLI > env > project > defaults.

pub mod audit_config;
pub mod oracle_config;
pub mod parser_config;
pub mod report_config;
pub mod scan_config;

pub use audit_config::{AuditConfig, CliOverrides};
pub use oracle_config::OracleConfig;
pub use parser_config::ParserConfig;
pub use report_config::ReportConfig;
pub use scan_config::ScanConfig;
