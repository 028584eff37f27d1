//! The audit pipeline: locate, parse in parallel, cross-check, assemble.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use markaudit_core::config::AuditConfig;
use markaudit_core::errors::{AuditError, OracleError, ScanError};
use rayon::prelude::*;

use super::types::{AuditResult, AuditWarning, OracleCounts, TestFile, TestFunction};
use crate::oracle::CollectionOracle;
use crate::parametrize::count_instances;
use crate::parsers::{ParsedFile, PythonTestParser};
use crate::registry::CategoryRegistry;
use crate::scanner::{ScanCancellation, TestFileLocator};

/// Runs audits against a registry and a resolved configuration.
pub struct Auditor<'a> {
    registry: &'a CategoryRegistry,
    config: &'a AuditConfig,
    oracle: Option<&'a dyn CollectionOracle>,
    cancellation: ScanCancellation,
}

struct FileOutcome {
    file: TestFile,
    warnings: Vec<AuditWarning>,
}

impl<'a> Auditor<'a> {
    pub fn new(registry: &'a CategoryRegistry, config: &'a AuditConfig) -> Self {
        Self {
            registry,
            config,
            oracle: None,
            cancellation: ScanCancellation::new(),
        }
    }

    /// Cross-check against `oracle`. Ignored when `oracle.enabled` is false.
    pub fn with_oracle(mut self, oracle: &'a dyn CollectionOracle) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn with_cancellation(mut self, cancellation: ScanCancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Audit the configured test directories of a project.
    ///
    /// Reported paths are relative to `project_root`. An empty
    /// `scan.test_dirs` audits the root itself.
    pub fn audit(&self, project_root: &Path) -> Result<AuditResult, AuditError> {
        let dirs = self.config.scan.effective_test_dirs();
        let roots: Vec<PathBuf> = if dirs.is_empty() {
            vec![project_root.to_path_buf()]
        } else {
            dirs.iter().map(|d| project_root.join(d)).collect()
        };
        self.run(project_root, &roots)
    }

    /// Audit explicit root directories. Paths are reported relative to the
    /// parent of the first root.
    pub fn audit_suite(&self, root_dirs: &[PathBuf]) -> Result<AuditResult, AuditError> {
        let base = root_dirs
            .first()
            .and_then(|r| r.parent())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.run(&base, root_dirs)
    }

    fn run(&self, base: &Path, roots: &[PathBuf]) -> Result<AuditResult, AuditError> {
        let start = Instant::now();
        let located = TestFileLocator::new(&self.config.scan)
            .with_cancellation(self.cancellation.clone())
            .locate(roots)
            .map_err(|e| match e {
                ScanError::Cancelled => AuditError::Cancelled,
                other => AuditError::Scan(other),
            })?;

        let mut warnings: Vec<AuditWarning> = located
            .errors
            .iter()
            .map(|detail| AuditWarning::ScanProblem {
                detail: detail.clone(),
            })
            .collect();

        let outcomes = self.parse_all(base, &located.files)?;
        self.check_cancelled()?;

        let mut files = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            warnings.extend(outcome.warnings);
            files.push(outcome.file);
        }

        let oracle_counts = self.query_oracle(&mut warnings);
        self.check_cancelled()?;

        let result = AuditResult::assemble(files, oracle_counts, self.registry, warnings);
        tracing::info!(
            files = result.total_files(),
            tests = result.total_test_instances(),
            categorized = result.categorized_instances(),
            uncategorized_functions = result.uncategorized_functions().len(),
            warnings = result.warnings().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "audit complete"
        );
        Ok(result)
    }

    fn parse_all(&self, base: &Path, paths: &[PathBuf]) -> Result<Vec<FileOutcome>, AuditError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.scan.effective_threads())
            .build()
            .map_err(|e| ScanError::WorkerPool {
                message: e.to_string(),
            })?;
        let parser = PythonTestParser::new(self.registry, &self.config.parser);

        let outcomes: Vec<Option<FileOutcome>> = pool.install(|| {
            paths
                .par_iter()
                .map(|path| {
                    if self.cancellation.is_cancelled() {
                        return None;
                    }
                    Some(self.parse_one(&parser, base, path))
                })
                .collect()
        });

        // A `None` means the run was cancelled mid-way; partial output is discarded.
        outcomes
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(AuditError::Cancelled)
    }

    fn parse_one(&self, parser: &PythonTestParser<'_>, base: &Path, path: &Path) -> FileOutcome {
        let relative = relative_path(base, path);
        match parser.parse_file(path, &relative) {
            Ok(parsed) => self.to_test_file(parser, parsed),
            Err(err) => {
                tracing::warn!(path = %relative, error = %err, "could not parse test file");
                FileOutcome {
                    file: TestFile::new(relative.clone(), Vec::new()),
                    warnings: vec![AuditWarning::ParseFailure {
                        path: relative,
                        detail: err.to_string(),
                    }],
                }
            }
        }
    }

    fn to_test_file(&self, parser: &PythonTestParser<'_>, parsed: ParsedFile) -> FileOutcome {
        let warnings = parsed
            .duplicates
            .iter()
            .map(|dup| AuditWarning::DuplicateTest {
                path: parsed.path.clone(),
                name: match &dup.class_path {
                    Some(class) => format!("{class}::{}", dup.name),
                    None => dup.name.clone(),
                },
                line: dup.line,
                first_line: dup.first_line,
            })
            .collect();

        let functions = parsed
            .tests
            .into_iter()
            .map(|test| TestFunction {
                instance_count: count_instances(&test.decorators, parser.matcher()),
                name: test.name,
                class_name: test.class_path,
                file_path: parsed.path.clone(),
                line_number: test.line,
                markers: test.markers,
                is_async: test.is_async,
                docstring: test.docstring,
            })
            .collect();

        FileOutcome {
            file: TestFile::new(parsed.path, functions),
            warnings,
        }
    }

    /// One concurrent query per category plus the total. Failures count as 0.
    fn query_oracle(&self, warnings: &mut Vec<AuditWarning>) -> Option<OracleCounts> {
        let oracle = self.oracle.filter(|_| self.config.oracle.effective_enabled())?;
        let start = Instant::now();
        let names: Vec<&'static str> = self.registry.names().collect();

        let (per_category, total) = thread::scope(|scope| {
            let category_handles: Vec<_> = names
                .iter()
                .map(|&name| (name, scope.spawn(move || oracle.count_for_category(name))))
                .collect();
            let total_handle = scope.spawn(|| oracle.total_count());

            let per_category: Vec<(&'static str, Result<u64, OracleError>)> = category_handles
                .into_iter()
                .map(|(name, handle)| (name, join_query(handle)))
                .collect();
            (per_category, join_query(total_handle))
        });

        let mut counts = OracleCounts {
            per_category: BTreeMap::new(),
            total: None,
        };
        let mut failed = 0usize;
        for (name, result) in per_category {
            let count = match result {
                Ok(count) => count,
                Err(err) => {
                    tracing::warn!(category = name, error = %err, "oracle query failed, counting 0");
                    failed += 1;
                    warnings.push(AuditWarning::OracleFailure {
                        category: Some(name.to_string()),
                        detail: err.to_string(),
                    });
                    0
                }
            };
            counts.per_category.insert(name.to_string(), count);
        }
        match total {
            Ok(total) => counts.total = Some(total),
            Err(err) => {
                tracing::warn!(error = %err, "oracle total query failed");
                failed += 1;
                warnings.push(AuditWarning::OracleFailure {
                    category: None,
                    detail: err.to_string(),
                });
            }
        }

        tracing::debug!(
            queries = names.len() + 1,
            failed,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "oracle cross-check finished"
        );
        Some(counts)
    }

    fn check_cancelled(&self) -> Result<(), AuditError> {
        if self.cancellation.is_cancelled() {
            Err(AuditError::Cancelled)
        } else {
            Ok(())
        }
    }
}

fn join_query(handle: thread::ScopedJoinHandle<'_, Result<u64, OracleError>>) -> Result<u64, OracleError> {
    handle.join().unwrap_or_else(|_| {
        Err(OracleError::Io {
            message: "oracle query panicked".to_string(),
        })
    })
}

/// `/`-separated path of `path` below `base`.
fn relative_path(base: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
