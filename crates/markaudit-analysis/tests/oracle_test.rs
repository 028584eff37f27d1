//! Collection oracle tests against `sh` stand-ins for pytest.

#![cfg(unix)]

use std::time::{Duration, Instant};

use markaudit_analysis::oracle::{CollectionOracle, PytestOracle};
use markaudit_core::config::OracleConfig;
use markaudit_core::errors::{ErrorCode, OracleError};

/// An oracle whose "pytest" is the given shell script. Collection arguments
/// arrive as `$1..`: `--collect-only -q -p no:cacheprovider [-m <category>]`.
fn script_oracle(script: &str, root: &std::path::Path) -> PytestOracle {
    let config = OracleConfig {
        command: Some(vec![
            "sh".to_string(),
            "-c".to_string(),
            script.to_string(),
            "sh".to_string(),
        ]),
        ..Default::default()
    };
    PytestOracle::new(&config, root)
}

#[test]
fn test_counts_collected_node_ids() {
    let dir = tempfile::TempDir::new().unwrap();
    let oracle = script_oracle(
        r#"printf 'tests/test_a.py::test_one\ntests/test_a.py::TestX::test_two[1]\n\n2 tests collected in 0.01s\n'"#,
        dir.path(),
    );
    assert_eq!(oracle.total_count().unwrap(), 2);
}

#[test]
fn test_category_filter_is_passed() {
    let dir = tempfile::TempDir::new().unwrap();
    let oracle = script_oracle(
        r#"if [ "$5" = "-m" ]; then echo "tests/test_a.py::test_$6"; else printf 'a.py::x\nb.py::y\nc.py::z\n'; fi"#,
        dir.path(),
    );
    assert_eq!(oracle.count_for_category("unit").unwrap(), 1);
    assert_eq!(oracle.total_count().unwrap(), 3);
}

#[test]
fn test_runs_in_scan_root() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("pytest.ini"), "[pytest]\n").unwrap();
    let oracle = script_oracle(r#"test -f pytest.ini && echo "t.py::found""#, dir.path());
    assert_eq!(oracle.total_count().unwrap(), 1);
}

#[test]
fn test_no_tests_collected_is_zero() {
    let dir = tempfile::TempDir::new().unwrap();
    let oracle = script_oracle("echo 'no tests ran'; exit 5", dir.path());
    assert_eq!(oracle.count_for_category("e2e").unwrap(), 0);
}

#[test]
fn test_nonzero_exit_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let oracle = script_oracle("echo 'a.py::x'; echo boom >&2; exit 2", dir.path());
    let err = oracle.total_count().unwrap_err();
    match &err {
        OracleError::NonZeroExit { code, stderr } => {
            assert_eq!(*code, 2);
            assert_eq!(stderr, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.error_code(), "ORACLE_ERROR");
}

#[test]
fn test_slow_collection_times_out() {
    let dir = tempfile::TempDir::new().unwrap();
    let oracle = script_oracle("exec sleep 10", dir.path()).with_timeout(Duration::from_millis(200));
    let start = Instant::now();
    let err = oracle.total_count().unwrap_err();
    assert!(matches!(err, OracleError::Timeout { .. }));
    assert_eq!(err.error_code(), "ORACLE_TIMEOUT");
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_missing_program_is_a_spawn_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = OracleConfig {
        command: Some(vec!["markaudit-no-such-program".to_string()]),
        ..Default::default()
    };
    let err = PytestOracle::new(&config, dir.path()).total_count().unwrap_err();
    assert!(matches!(err, OracleError::Spawn { .. }));
}

#[test]
fn test_empty_command_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = OracleConfig {
        command: Some(Vec::new()),
        ..Default::default()
    };
    let err = PytestOracle::new(&config, dir.path()).total_count().unwrap_err();
    assert!(matches!(err, OracleError::EmptyCommand));
}
