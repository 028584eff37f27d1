//! markaudit-analysis: the pytest marker audit engine.
//!
//! Pipeline: scanner → parsers → parametrize → audit (with oracle) → reporters.

pub mod audit;
pub mod oracle;
pub mod parametrize;
pub mod parsers;
pub mod registry;
pub mod reporters;
pub mod scanner;

pub use audit::{AuditResult, Auditor};
pub use oracle::{CollectionOracle, PytestOracle};
pub use registry::{Category, CategoryRegistry};
pub use reporters::{available_formats, create_reporter, Reporter};
