//! Shared constants for the markaudit engine.

/// Project config file looked up in the scan root.
pub const PROJECT_CONFIG_FILE: &str = "markaudit.toml";

/// Environment variable carrying per-target log directives.
pub const LOG_ENV_VAR: &str = "MARKAUDIT_LOG";

/// Default test directories, relative to the scan root.
pub const DEFAULT_TEST_DIRS: &[&str] = &["tests"];

/// Default test file name prefix.
pub const DEFAULT_FILE_PREFIX: &str = "test_";

/// Default recognized source extensions.
pub const DEFAULT_EXTENSIONS: &[&str] = &["py"];

/// Default prefix for test functions and methods.
pub const DEFAULT_FUNCTION_PREFIX: &str = "test_";

/// Default prefix for test classes.
pub const DEFAULT_CLASS_PREFIX: &str = "test_";

/// Substring that marks a class as a test class.
pub const DEFAULT_CLASS_MARKER: &str = "Test";

/// Module exposing `<namespace>.mark.<name>`.
pub const DEFAULT_MARK_NAMESPACE: &str = "pytest";

/// Default collection command.
pub const DEFAULT_ORACLE_COMMAND: &[&str] = &["python", "-m", "pytest"];

/// Default per-query oracle timeout.
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 120;

/// Largest uncategorized-function count that still rates GOOD.
pub const DEFAULT_GOOD_THRESHOLD: usize = 5;

/// pytest exit status meaning "no tests were collected".
pub const PYTEST_NO_TESTS_COLLECTED: i32 = 5;
