//! JSON reporter: the machine contract consumed by CI tooling.

use serde_json::json;

use markaudit_core::errors::ReportError;

use super::Reporter;
use crate::audit::AuditResult;

pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn generate(&self, result: &AuditResult) -> Result<String, ReportError> {
        let files: Vec<serde_json::Value> = result
            .files()
            .iter()
            .map(|file| {
                json!({
                    "path": file.relative_path,
                    "test_count": file.total_instances,
                    "functions": file.functions.iter().map(|f| json!({
                        "name": f.name,
                        "class": f.class_name,
                        "markers": f.markers,
                        "line": f.line_number,
                        "async": f.is_async,
                        "instance_count": f.instance_count,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();

        let uncategorized: Vec<serde_json::Value> = result
            .uncategorized_functions()
            .iter()
            .map(|f| {
                json!({
                    "name": f.qualified_name(),
                    "file": f.file_path,
                    "line": f.line_number,
                })
            })
            .collect();

        let output = json!({
            "summary": {
                "total_tests": result.total_test_instances(),
                "total_files": result.total_files(),
                "categorized": result.categorized_instances(),
                "uncategorized": result.uncategorized_instances(),
                "uncategorized_functions": result.uncategorized_functions().len(),
                "categorization_percentage": round1(result.categorization_percentage()),
                "category_count_source": result.category_count_source(),
            },
            "categories": result.category_counts(),
            "files": files,
            "issues": result.issues(),
            "warnings": result.warnings(),
            "uncategorized_tests": uncategorized,
        });

        serde_json::to_string_pretty(&output).map_err(|e| ReportError::Serialization {
            format: self.name().to_string(),
            message: e.to_string(),
        })
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
