//! markaudit-core: configuration, errors, tracing, and constants shared by
//! the audit engine and its command-line front end.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::AuditConfig;
