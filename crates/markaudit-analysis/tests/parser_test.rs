//! Source parser tests: discovery scopes, marker shapes, inheritance.

use markaudit_analysis::parsers::{DiscoveredTest, ParsedFile, PythonTestParser};
use markaudit_analysis::registry::CategoryRegistry;
use markaudit_core::config::ParserConfig;
use markaudit_core::errors::ParseError;

fn parse(source: &str) -> ParsedFile {
    let registry = CategoryRegistry::builtin();
    let config = ParserConfig::default();
    PythonTestParser::new(&registry, &config)
        .parse_source(source, "tests/test_sample.py")
        .unwrap()
}

fn find<'a>(file: &'a ParsedFile, class: Option<&str>, name: &str) -> &'a DiscoveredTest {
    file.tests
        .iter()
        .find(|t| t.name == name && t.class_path.as_deref() == class)
        .unwrap_or_else(|| panic!("{name} not discovered"))
}

fn markers(test: &DiscoveredTest) -> Vec<&str> {
    test.markers.iter().map(String::as_str).collect()
}

#[test]
fn test_three_decorator_shapes() {
    let file = parse(
        r#"import pytest

@pytest.mark.unit
def test_attr():
    """Checks the attribute shape."""
    assert True

@pytest.mark.integration()
def test_call():
    pass

@smoke
async def test_alias():
    pass

@pytest.fixture
@pytest.mark.asyncio
def test_unrecognized():
    pass

def helper():
    pass
"#,
    );

    let names: Vec<&str> = file.tests.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["test_attr", "test_call", "test_alias", "test_unrecognized"]);

    let attr = find(&file, None, "test_attr");
    assert_eq!(markers(attr), vec!["unit"]);
    assert_eq!(attr.line, 4);
    assert!(!attr.is_async);
    assert_eq!(attr.docstring.as_deref(), Some("Checks the attribute shape."));
    assert_eq!(attr.decorators.len(), 1);

    assert_eq!(markers(find(&file, None, "test_call")), vec!["integration"]);

    let alias = find(&file, None, "test_alias");
    assert_eq!(markers(alias), vec!["smoke"]);
    assert!(alias.is_async);
    assert_eq!(alias.line, 13);

    let unrecognized = find(&file, None, "test_unrecognized");
    assert!(unrecognized.markers.is_empty());
    assert_eq!(unrecognized.decorators.len(), 2);
}

#[test]
fn test_class_markers_are_inherited() {
    let file = parse(
        r#"import pytest

@pytest.mark.integration
class TestApi:
    def test_plain(self):
        pass

    @pytest.mark.slow
    def test_slow(self):
        pass

    def helper(self):
        pass
"#,
    );

    assert_eq!(file.tests.len(), 2);
    let plain = find(&file, Some("TestApi"), "test_plain");
    assert_eq!(markers(plain), vec!["integration"]);
    let slow = find(&file, Some("TestApi"), "test_slow");
    assert_eq!(markers(slow), vec!["integration", "slow"]);
}

#[test]
fn test_same_name_in_different_scopes_is_distinct() {
    let file = parse(
        r#"import pytest

def test_create():
    pass

class TestUsers:
    @pytest.mark.unit
    def test_create(self):
        pass

class TestGroups:
    @pytest.mark.e2e
    def test_create(self):
        pass
"#,
    );

    assert_eq!(file.tests.len(), 3);
    assert!(file.duplicates.is_empty());
    assert!(find(&file, None, "test_create").markers.is_empty());
    assert_eq!(markers(find(&file, Some("TestUsers"), "test_create")), vec!["unit"]);
    assert_eq!(markers(find(&file, Some("TestGroups"), "test_create")), vec!["e2e"]);
}

#[test]
fn test_true_duplicate_keeps_first_declaration() {
    let file = parse(
        r#"import pytest

@pytest.mark.unit
def test_twice():
    pass

def test_twice():
    pass
"#,
    );

    assert_eq!(file.tests.len(), 1);
    assert_eq!(markers(&file.tests[0]), vec!["unit"]);
    assert_eq!(file.duplicates.len(), 1);
    let dup = &file.duplicates[0];
    assert_eq!((dup.name.as_str(), dup.line, dup.first_line), ("test_twice", 7, 4));
}

#[test]
fn test_nested_classes_inherit_from_enclosing_test_class() {
    let file = parse(
        r#"import pytest

@pytest.mark.integration
class TestOuter:
    @pytest.mark.slow
    class TestInner:
        def test_deep(self):
            pass
"#,
    );

    let deep = find(&file, Some("TestOuter::TestInner"), "test_deep");
    assert_eq!(markers(deep), vec!["integration", "slow"]);
}

#[test]
fn test_pytestmark_assignments() {
    let file = parse(
        r#"import pytest

pytestmark = pytest.mark.regression

def test_module_level():
    pass

class TestMarked:
    pytestmark = [pytest.mark.security, pytest.mark.parametrize("x", [1])]

    def test_method(self, x):
        pass
"#,
    );

    assert_eq!(markers(find(&file, None, "test_module_level")), vec!["regression"]);
    assert_eq!(
        markers(find(&file, Some("TestMarked"), "test_method")),
        vec!["regression", "security"]
    );
}

#[test]
fn test_module_tests_inside_conditional_blocks() {
    let file = parse(
        r#"import sys
import pytest

if sys.platform:
    @pytest.mark.unit
    def test_cond():
        pass
else:
    def test_other():
        pass

try:
    import json
except ImportError:
    def test_fallback():
        pass
else:
    def test_json():
        pass

with open(__file__):
    class TestGuarded:
        if sys.platform:
            def test_method(self):
                pass
"#,
    );

    let names: Vec<&str> = file.tests.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["test_cond", "test_other", "test_fallback", "test_json", "test_method"]
    );
    assert_eq!(find(&file, None, "test_cond").class_path, None);
    assert_eq!(markers(find(&file, None, "test_cond")), vec!["unit"]);
    assert!(find(&file, Some("TestGuarded"), "test_method").markers.is_empty());
}

#[test]
fn test_definitions_inside_functions_are_not_collected() {
    let file = parse(
        r#"def helper():
    class TestInner:
        def test_x(self):
            pass
    return TestInner

def test_outer():
    def test_nested():
        pass
    test_nested()

class TestSuite:
    def test_method(self):
        class TestLocal:
            def test_local(self):
                pass
"#,
    );

    let found: Vec<(Option<&str>, &str)> = file
        .tests
        .iter()
        .map(|t| (t.class_path.as_deref(), t.name.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![(None, "test_outer"), (Some("TestSuite"), "test_method")]
    );
}

#[test]
fn test_class_name_heuristic() {
    let file = parse(
        r#"class Helper:
    def test_hidden(self):
        pass

class TestingUtilities:
    def test_found(self):
        pass

class test_lowercase:
    def test_also_found(self):
        pass
"#,
    );

    let names: Vec<&str> = file.tests.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["test_found", "test_also_found"]);
}

#[test]
fn test_multiline_docstring_is_cleaned() {
    let file = parse(
        "def test_doc():\n    \"\"\"Summary line.\n\n    First detail.\n        Nested detail.\n    \"\"\"\n    pass\n",
    );
    assert_eq!(
        file.tests[0].docstring.as_deref(),
        Some("Summary line.\n\nFirst detail.\n    Nested detail.")
    );
}

#[test]
fn test_syntax_error_fails_the_file() {
    let registry = CategoryRegistry::builtin();
    let config = ParserConfig::default();
    let err = PythonTestParser::new(&registry, &config)
        .parse_source("def test_broken(:\n    pass\n", "tests/test_broken.py")
        .unwrap_err();
    assert!(matches!(err, ParseError::SyntaxError { line: 1, .. }));
}

#[test]
fn test_unreadable_file_is_reported() {
    let registry = CategoryRegistry::builtin();
    let config = ParserConfig::default();
    let dir = tempfile::TempDir::new().unwrap();
    let err = PythonTestParser::new(&registry, &config)
        .parse_file(&dir.path().join("test_missing.py"), "test_missing.py")
        .unwrap_err();
    assert!(matches!(err, ParseError::Unreadable { .. }));
}

#[test]
fn test_custom_namespace_and_prefix() {
    let registry = CategoryRegistry::builtin();
    let config = ParserConfig {
        function_prefix: Some("check_".to_string()),
        mark_namespace: Some("pt".to_string()),
        ..Default::default()
    };
    let file = PythonTestParser::new(&registry, &config)
        .parse_source(
            "import pytest as pt\n\n@pt.mark.unit\ndef check_it():\n    pass\n\ndef test_ignored():\n    pass\n",
            "tests/test_custom.py",
        )
        .unwrap();
    assert_eq!(file.tests.len(), 1);
    assert_eq!(markers(&file.tests[0]), vec!["unit"]);
}
