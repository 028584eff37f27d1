//! Console reporter: human-readable output with optional color codes.

use std::fmt::Write;

use markaudit_core::errors::ReportError;

use super::Reporter;
use crate::audit::types::percentage;
use crate::audit::{AuditResult, Verdict};
use crate::registry::CategoryRegistry;

pub struct ConsoleReporter {
    registry: CategoryRegistry,
    good_threshold: usize,
    pub use_color: bool,
}

impl ConsoleReporter {
    pub fn new(registry: CategoryRegistry, good_threshold: usize, use_color: bool) -> Self {
        Self {
            registry,
            good_threshold,
            use_color,
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn heading(&self, out: &mut String, title: &str) {
        let _ = writeln!(out, "\n{}", self.paint("1", title));
        let _ = writeln!(out, "{}", "─".repeat(title.chars().count()));
    }

    fn verdict_color(verdict: Verdict) -> &'static str {
        match verdict {
            Verdict::Excellent => "32",
            Verdict::Good => "33",
            Verdict::NeedsImprovement => "31",
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(
            CategoryRegistry::builtin(),
            markaudit_core::constants::DEFAULT_GOOD_THRESHOLD,
            true,
        )
    }
}

impl Reporter for ConsoleReporter {
    fn name(&self) -> &'static str {
        "console"
    }

    fn generate(&self, result: &AuditResult) -> Result<String, ReportError> {
        let mut out = String::new();
        let total = result.total_test_instances();

        out.push_str("╔══════════════════════════════════════════╗\n");
        out.push_str("║          Test Suite Marker Audit         ║\n");
        out.push_str("╚══════════════════════════════════════════╝\n");

        self.heading(&mut out, "Overall Statistics");
        let _ = writeln!(out, "  Total tests: {total}");
        let _ = writeln!(out, "  Total files: {}", result.total_files());
        let _ = writeln!(
            out,
            "  Categorized: {} ({:.1}%)",
            result.categorized_instances(),
            result.categorization_percentage()
        );
        let _ = writeln!(
            out,
            "  Uncategorized: {} ({} functions)",
            result.uncategorized_instances(),
            result.uncategorized_functions().len()
        );

        self.heading(
            &mut out,
            &format!("Tests by Category ({} counts)", result.category_count_source()),
        );
        for category in self.registry.all_categories() {
            let count = result.category_counts().get(category.name).copied().unwrap_or(0);
            if count == 0 {
                continue;
            }
            let _ = writeln!(
                out,
                "  {} {:<12} {:>6} ({:>5.1}%)  {}",
                category.display_glyph,
                category.name,
                count,
                percentage(count, total),
                category.description
            );
        }

        self.heading(&mut out, "Tests by File");
        let mut files: Vec<_> = result.files().iter().filter(|f| f.total_instances > 0).collect();
        files.sort_by(|a, b| {
            b.total_instances
                .cmp(&a.total_instances)
                .then_with(|| a.relative_path.cmp(&b.relative_path))
        });
        for file in files {
            let _ = writeln!(out, "  {:>6}  {}", file.total_instances, file.relative_path);
        }

        if !result.issues().is_empty() {
            self.heading(&mut out, "Issues");
            for issue in result.issues() {
                let _ = writeln!(out, "  {} {issue}", self.paint("31", "✗"));
            }
        }

        if !result.warnings().is_empty() {
            self.heading(&mut out, "Warnings");
            for warning in result.warnings() {
                let _ = writeln!(out, "  {} {warning}", self.paint("33", "⚠"));
            }
        }

        if !result.uncategorized_functions().is_empty() {
            self.heading(&mut out, "Uncategorized Tests");
            for function in result.uncategorized_functions() {
                let _ = writeln!(
                    out,
                    "  - {} ({}:{})",
                    function.qualified_name(),
                    function.file_path,
                    function.line_number
                );
            }
        }

        let verdict = result.verdict(self.good_threshold);
        let _ = writeln!(
            out,
            "\nVerdict: {}",
            self.paint(Self::verdict_color(verdict), verdict.label())
        );
        Ok(out)
    }
}
