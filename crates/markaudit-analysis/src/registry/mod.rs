//! Category registry: the fixed taxonomy of recognized test categories.
//!
//! The table is compiled in and never changes at runtime. Consumers receive a
//! `&CategoryRegistry` instead of reaching for a global.

use serde::Serialize;

/// One recognized test category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: &'static str,
    pub description: &'static str,
    /// Glob-like hints for where tests of this category usually live.
    /// Informational only; never used for matching.
    pub expected_name_patterns: &'static [&'static str],
    pub display_glyph: &'static str,
}

const BUILTIN_CATEGORIES: &[Category] = &[
    Category {
        name: "unit",
        description: "Fast, isolated tests of a single function or class",
        expected_name_patterns: &["tests/unit/**", "test_*_unit.py"],
        display_glyph: "🧪",
    },
    Category {
        name: "integration",
        description: "Tests exercising several components or real backing services together",
        expected_name_patterns: &["tests/integration/**", "test_*_integration.py"],
        display_glyph: "🔗",
    },
    Category {
        name: "e2e",
        description: "End-to-end tests driving the system through its public interface",
        expected_name_patterns: &["tests/e2e/**", "test_*_e2e.py"],
        display_glyph: "🌐",
    },
    Category {
        name: "performance",
        description: "Benchmarks and load or latency assertions",
        expected_name_patterns: &["tests/performance/**", "test_*_perf.py", "test_*_benchmark.py"],
        display_glyph: "⚡",
    },
    Category {
        name: "security",
        description: "Authentication, authorization and input-hardening checks",
        expected_name_patterns: &["tests/security/**", "test_*_security.py"],
        display_glyph: "🔒",
    },
    Category {
        name: "smoke",
        description: "Minimal health checks run first to reject broken builds",
        expected_name_patterns: &["tests/smoke/**", "test_smoke_*.py"],
        display_glyph: "💨",
    },
    Category {
        name: "regression",
        description: "Tests pinning previously fixed bugs",
        expected_name_patterns: &["tests/regression/**", "test_*_regression.py", "test_issue_*.py"],
        display_glyph: "🔁",
    },
    Category {
        name: "slow",
        description: "Long-running tests excluded from quick local runs",
        expected_name_patterns: &["tests/slow/**", "test_*_slow.py"],
        display_glyph: "🐢",
    },
];

/// Read-only lookup over the category table.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRegistry {
    categories: &'static [Category],
}

impl CategoryRegistry {
    /// The compiled-in taxonomy.
    pub fn builtin() -> Self {
        Self {
            categories: BUILTIN_CATEGORIES,
        }
    }

    /// All categories, in display order.
    pub fn all_categories(&self) -> &'static [Category] {
        self.categories
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&'static Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Category names, in display order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.categories.iter().map(|c| c.name)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let registry = CategoryRegistry::builtin();
        let mut names: Vec<_> = registry.names().collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn lookup_is_exact() {
        let registry = CategoryRegistry::builtin();
        assert!(registry.is_known("unit"));
        assert!(registry.is_known("integration"));
        assert!(!registry.is_known("Unit"));
        assert!(!registry.is_known("parametrize"));
        assert_eq!(registry.get("smoke").map(|c| c.display_glyph), Some("💨"));
    }

    #[test]
    fn every_category_is_described() {
        for category in CategoryRegistry::builtin().all_categories() {
            assert!(!category.description.is_empty(), "{} lacks a description", category.name);
            assert!(!category.expected_name_patterns.is_empty());
        }
    }
}
