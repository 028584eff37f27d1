//! Reporters: output formats for audit results.
//!
//! Every reporter is a pure function of the `AuditResult`: the same input
//! renders byte-identical output.

pub mod console;
pub mod json;
pub mod markdown;

use markaudit_core::config::ReportConfig;
use markaudit_core::errors::ReportError;

use crate::audit::AuditResult;
use crate::registry::CategoryRegistry;

/// Trait for report generation.
pub trait Reporter: Send + Sync {
    fn name(&self) -> &'static str;
    fn generate(&self, result: &AuditResult) -> Result<String, ReportError>;
}

/// Create a reporter by format name.
pub fn create_reporter(
    format: &str,
    registry: CategoryRegistry,
    config: &ReportConfig,
    use_color: bool,
) -> Option<Box<dyn Reporter>> {
    match format {
        "console" => Some(Box::new(console::ConsoleReporter::new(
            registry,
            config.effective_good_threshold(),
            use_color,
        ))),
        "json" => Some(Box::new(json::JsonReporter)),
        "markdown" => Some(Box::new(markdown::MarkdownReporter::new(registry))),
        _ => None,
    }
}

/// List all available reporter format names.
pub fn available_formats() -> &'static [&'static str] {
    &["console", "json", "markdown"]
}
