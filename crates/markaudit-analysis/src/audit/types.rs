//! Audit result types.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Serialize, Serializer};

use crate::registry::CategoryRegistry;

/// One discovered test with its instance count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestFunction {
    pub name: String,
    /// Qualified enclosing class, `Outer::Inner`.
    pub class_name: Option<String>,
    pub file_path: String,
    pub line_number: u32,
    pub markers: BTreeSet<String>,
    pub is_async: bool,
    pub docstring: Option<String>,
    pub instance_count: u64,
}

impl TestFunction {
    pub fn is_categorized(&self) -> bool {
        !self.markers.is_empty()
    }

    /// `Class::name` for methods, `name` otherwise.
    pub fn qualified_name(&self) -> String {
        match &self.class_name {
            Some(class) => format!("{class}::{}", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestFile {
    pub relative_path: String,
    pub functions: Vec<TestFunction>,
    pub total_instances: u64,
}

impl TestFile {
    pub fn new(relative_path: impl Into<String>, functions: Vec<TestFunction>) -> Self {
        let total_instances = functions
            .iter()
            .fold(0u64, |acc, f| acc.saturating_add(f.instance_count));
        Self {
            relative_path: relative_path.into(),
            functions,
            total_instances,
        }
    }
}

/// Reported problems. These feed `--strict`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditIssue {
    CategorizationGap { functions: usize, instances: u64 },
}

impl fmt::Display for AuditIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CategorizationGap {
                functions,
                instances,
            } => write!(
                f,
                "Found {functions} uncategorized test functions ({instances} test instances)"
            ),
        }
    }
}

/// Recovered failures and informational findings. Never affect the exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditWarning {
    ParseFailure {
        path: String,
        detail: String,
    },
    /// `category` is `None` for the unfiltered total.
    OracleFailure {
        category: Option<String>,
        detail: String,
    },
    CountMismatch {
        static_total: u64,
        oracle_total: u64,
    },
    DuplicateTest {
        path: String,
        name: String,
        line: u32,
        first_line: u32,
    },
    ScanProblem {
        detail: String,
    },
}

impl fmt::Display for AuditWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseFailure { path, detail } => write!(f, "could not parse {path}: {detail}"),
            Self::OracleFailure {
                category: Some(category),
                detail,
            } => write!(f, "collection failed for category '{category}': {detail}"),
            Self::OracleFailure {
                category: None,
                detail,
            } => write!(f, "collection failed for the full suite: {detail}"),
            Self::CountMismatch {
                static_total,
                oracle_total,
            } => write!(
                f,
                "static analysis found {static_total} test instances but the collector reported {oracle_total}"
            ),
            Self::DuplicateTest {
                path,
                name,
                line,
                first_line,
            } => write!(
                f,
                "{path}:{line}: {name} redefines the test declared at line {first_line}"
            ),
            Self::ScanProblem { detail } => write!(f, "scan problem: {detail}"),
        }
    }
}

macro_rules! serialize_as_display {
    ($($ty:ty),*) => {
        $(impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        })*
    };
}

serialize_as_display!(AuditIssue, AuditWarning);

/// Where `category_counts` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CountSource {
    Oracle,
    Static,
}

impl fmt::Display for CountSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Oracle => "oracle",
            Self::Static => "static",
        })
    }
}

/// Answers gathered from a collection oracle. Failed queries are already 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OracleCounts {
    pub per_category: BTreeMap<String, u64>,
    /// `None` when the unfiltered query failed.
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Excellent,
    Good,
    NeedsImprovement,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::Good => "GOOD",
            Self::NeedsImprovement => "NEEDS IMPROVEMENT",
        }
    }
}

/// Whole-suite snapshot. Only constructible through [`AuditResult::assemble`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditResult {
    total_test_instances: u64,
    categorized_instances: u64,
    uncategorized_functions: Vec<TestFunction>,
    category_counts: BTreeMap<String, u64>,
    static_category_counts: BTreeMap<String, u64>,
    category_count_source: CountSource,
    issues: Vec<AuditIssue>,
    warnings: Vec<AuditWarning>,
    files: Vec<TestFile>,
}

impl AuditResult {
    /// Derive every total from `files`.
    ///
    /// With `oracle` present its per-category answers become the category
    /// counts and a differing total adds a `CountMismatch` warning. Without
    /// it the static counts are used.
    pub fn assemble(
        files: Vec<TestFile>,
        oracle: Option<OracleCounts>,
        registry: &CategoryRegistry,
        mut warnings: Vec<AuditWarning>,
    ) -> Self {
        let mut total_test_instances = 0u64;
        let mut categorized_instances = 0u64;
        let mut uncategorized_functions = Vec::new();
        let mut static_category_counts: BTreeMap<String, u64> =
            registry.names().map(|n| (n.to_string(), 0)).collect();

        for function in files.iter().flat_map(|f| &f.functions) {
            total_test_instances = total_test_instances.saturating_add(function.instance_count);
            if !function.is_categorized() {
                uncategorized_functions.push(function.clone());
                continue;
            }
            categorized_instances = categorized_instances.saturating_add(function.instance_count);
            for marker in &function.markers {
                if let Some(count) = static_category_counts.get_mut(marker) {
                    *count = count.saturating_add(function.instance_count);
                }
            }
        }

        let mut issues = Vec::new();
        if !uncategorized_functions.is_empty() {
            issues.push(AuditIssue::CategorizationGap {
                functions: uncategorized_functions.len(),
                instances: uncategorized_functions
                    .iter()
                    .fold(0u64, |acc, f| acc.saturating_add(f.instance_count)),
            });
        }

        let (category_counts, category_count_source) = match oracle {
            Some(counts) => {
                if let Some(oracle_total) = counts.total {
                    if oracle_total != total_test_instances {
                        warnings.push(AuditWarning::CountMismatch {
                            static_total: total_test_instances,
                            oracle_total,
                        });
                    }
                }
                let mut per_category: BTreeMap<String, u64> =
                    registry.names().map(|n| (n.to_string(), 0)).collect();
                per_category.extend(counts.per_category);
                (per_category, CountSource::Oracle)
            }
            None => (static_category_counts.clone(), CountSource::Static),
        };

        Self {
            total_test_instances,
            categorized_instances,
            uncategorized_functions,
            category_counts,
            static_category_counts,
            category_count_source,
            issues,
            warnings,
            files,
        }
    }

    pub fn total_test_instances(&self) -> u64 {
        self.total_test_instances
    }

    pub fn total_files(&self) -> usize {
        self.files.len()
    }

    pub fn categorized_instances(&self) -> u64 {
        self.categorized_instances
    }

    pub fn uncategorized_instances(&self) -> u64 {
        self.total_test_instances.saturating_sub(self.categorized_instances)
    }

    pub fn uncategorized_functions(&self) -> &[TestFunction] {
        &self.uncategorized_functions
    }

    /// Per-category instance counts, keyed by every registry category.
    pub fn category_counts(&self) -> &BTreeMap<String, u64> {
        &self.category_counts
    }

    pub fn static_category_counts(&self) -> &BTreeMap<String, u64> {
        &self.static_category_counts
    }

    pub fn category_count_source(&self) -> CountSource {
        self.category_count_source
    }

    pub fn issues(&self) -> &[AuditIssue] {
        &self.issues
    }

    pub fn warnings(&self) -> &[AuditWarning] {
        &self.warnings
    }

    pub fn files(&self) -> &[TestFile] {
        &self.files
    }

    pub fn categorization_percentage(&self) -> f64 {
        percentage(self.categorized_instances, self.total_test_instances)
    }

    pub fn verdict(&self, good_threshold: usize) -> Verdict {
        let uncategorized = self.uncategorized_functions.len();
        let other_issues = self
            .issues
            .iter()
            .any(|i| !matches!(i, AuditIssue::CategorizationGap { .. }));
        match (uncategorized, other_issues) {
            (0, false) => Verdict::Excellent,
            (n, false) if n <= good_threshold => Verdict::Good,
            _ => Verdict::NeedsImprovement,
        }
    }
}

/// `part / whole` as a percentage; 0.0 for an empty whole.
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_guards_empty_total() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(format!("{:.1}", percentage(5, 0)), "0.0");
    }

    #[test]
    fn issue_text() {
        let issue = AuditIssue::CategorizationGap {
            functions: 1,
            instances: 1,
        };
        assert_eq!(
            issue.to_string(),
            "Found 1 uncategorized test functions (1 test instances)"
        );
        assert_eq!(
            serde_json::to_string(&issue).unwrap(),
            "\"Found 1 uncategorized test functions (1 test instances)\""
        );
    }
}
