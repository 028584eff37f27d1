//! Markdown reporter.

use std::fmt::Write;

use markaudit_core::errors::ReportError;

use super::Reporter;
use crate::audit::types::percentage;
use crate::audit::AuditResult;
use crate::registry::CategoryRegistry;

pub struct MarkdownReporter {
    registry: CategoryRegistry,
}

impl MarkdownReporter {
    pub fn new(registry: CategoryRegistry) -> Self {
        Self { registry }
    }
}

impl Reporter for MarkdownReporter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn generate(&self, result: &AuditResult) -> Result<String, ReportError> {
        let mut out = String::new();
        let total = result.total_test_instances();

        out.push_str("# Test Suite Marker Audit\n\n");

        out.push_str("## Overall Statistics\n\n");
        let _ = writeln!(out, "- **Total tests:** {total}");
        let _ = writeln!(out, "- **Total files:** {}", result.total_files());
        let _ = writeln!(
            out,
            "- **Categorized:** {} ({:.1}%)",
            result.categorized_instances(),
            result.categorization_percentage()
        );
        let _ = writeln!(
            out,
            "- **Uncategorized:** {} ({} functions)",
            result.uncategorized_instances(),
            result.uncategorized_functions().len()
        );
        let _ = writeln!(out, "- **Category counts from:** {}", result.category_count_source());

        out.push_str("\n## Test Categories\n");
        for category in self.registry.all_categories() {
            let count = result.category_counts().get(category.name).copied().unwrap_or(0);
            if count == 0 {
                continue;
            }
            let _ = writeln!(out, "\n### {} {}\n", category.display_glyph, category.name);
            let _ = writeln!(out, "- **Count:** {count} ({:.1}%)", percentage(count, total));
            let _ = writeln!(out, "- **Description:** {}", category.description);
        }

        if !result.issues().is_empty() {
            out.push_str("\n## Issues\n\n");
            for issue in result.issues() {
                let _ = writeln!(out, "- {issue}");
            }
        }

        if !result.warnings().is_empty() {
            out.push_str("\n## Warnings\n\n");
            for warning in result.warnings() {
                let _ = writeln!(out, "- {warning}");
            }
        }

        if !result.uncategorized_functions().is_empty() {
            out.push_str("\n## Uncategorized Tests\n\n");
            for function in result.uncategorized_functions() {
                let _ = writeln!(
                    out,
                    "- `{}` in `{}:{}`",
                    function.qualified_name(),
                    function.file_path,
                    function.line_number
                );
            }
        }

        Ok(out)
    }
}
