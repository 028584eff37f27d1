//! Python test discovery over tree-sitter-python syntax trees.
//!
//! Module-scope functions and every test class in the file (nested ones
//! included) are discovered in one walk. Blocks under `if`, `try` and `with`
//! stay in their enclosing scope; function bodies are never searched. Tests
//! are keyed by `(class path, name)`, so a module function and a method, or
//! two methods of different classes, never merge. A repeated declaration in the same scope keeps the first one and is
//! reported as a duplicate.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

use markaudit_core::config::ParserConfig;
use markaudit_core::errors::ParseError;
use markaudit_core::types::collections::{FxHashMap, SmallVec4};
use tree_sitter::{Node, Parser, Tree};

use super::decorators::MarkerMatcher;
use super::docstring;
use super::error_tolerant::count_errors;
use super::types::{ArgValue, CallArg, DecoratorExpr, DiscoveredTest, DuplicateTest, ParsedFile};
use crate::registry::CategoryRegistry;

thread_local! {
    static PYTHON_PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };
}

/// Module- or class-level assignment whose value contributes markers.
const PYTESTMARK: &str = "pytestmark";

/// Parses `test_*.py` files into discovered tests.
pub struct PythonTestParser<'a> {
    matcher: MarkerMatcher<'a>,
    function_prefix: &'a str,
    class_prefix: &'a str,
    class_marker: &'a str,
}

/// Where a block sits and what it inherits. Only the module and test class
/// bodies collect test functions.
struct Scope {
    path: Vec<String>,
    inherited: BTreeSet<String>,
    collects: bool,
}

impl Scope {
    fn class_path(&self) -> Option<String> {
        if self.path.is_empty() {
            None
        } else {
            Some(self.path.join("::"))
        }
    }
}

#[derive(Default)]
struct Discovery {
    tests: Vec<DiscoveredTest>,
    index: FxHashMap<(Option<String>, String), usize>,
    duplicates: Vec<DuplicateTest>,
}

impl Discovery {
    fn insert(&mut self, test: DiscoveredTest) {
        let key = (test.class_path.clone(), test.name.clone());
        if let Some(&first) = self.index.get(&key) {
            self.duplicates.push(DuplicateTest {
                name: test.name,
                class_path: test.class_path,
                line: test.line,
                first_line: self.tests[first].line,
            });
            return;
        }
        self.index.insert(key, self.tests.len());
        self.tests.push(test);
    }
}

impl<'a> PythonTestParser<'a> {
    pub fn new(registry: &'a CategoryRegistry, config: &'a ParserConfig) -> Self {
        Self {
            matcher: MarkerMatcher::new(registry, config.effective_mark_namespace()),
            function_prefix: config.effective_function_prefix(),
            class_prefix: config.effective_class_prefix(),
            class_marker: config.effective_class_marker(),
        }
    }

    pub fn matcher(&self) -> &MarkerMatcher<'a> {
        &self.matcher
    }

    /// Read and parse one file. `relative_path` is recorded on the result.
    pub fn parse_file(&self, path: &Path, relative_path: &str) -> Result<ParsedFile, ParseError> {
        let source = std::fs::read_to_string(path).map_err(|e| ParseError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.parse_source(&source, relative_path)
    }

    /// Parse source text. Any syntax error fails the whole file.
    pub fn parse_source(&self, source: &str, relative_path: &str) -> Result<ParsedFile, ParseError> {
        let start = Instant::now();
        let tree = parse_tree(source, relative_path)?;
        let root = tree.root_node();

        if root.has_error() {
            let (error_count, positions) = count_errors(root);
            let first = positions.first().copied();
            return Err(ParseError::SyntaxError {
                path: relative_path.into(),
                line: first.map_or(1, |p| p.row + 1),
                column: first.map_or(1, |p| p.column + 1),
                error_count,
            });
        }

        let src = source.as_bytes();
        let mut discovery = Discovery::default();
        let scope = Scope {
            path: Vec::new(),
            inherited: self.pytestmark_markers(root, src),
            collects: true,
        };
        self.walk_block(root, src, &scope, &mut discovery);

        let mut tests = discovery.tests;
        tests.sort_by(|a, b| a.line.cmp(&b.line).then_with(|| a.name.cmp(&b.name)));

        let parse_time_us = start.elapsed().as_micros() as u64;
        tracing::debug!(
            path = relative_path,
            tests = tests.len(),
            duplicates = discovery.duplicates.len(),
            parse_time_us,
            "parsed test file"
        );

        Ok(ParsedFile {
            path: relative_path.to_string(),
            tests,
            duplicates: discovery.duplicates,
            parse_time_us,
        })
    }

    /// Visit the statements of a module or class body. Compound statements are
    /// entered; function bodies never are.
    fn walk_block(&self, block: Node, src: &[u8], scope: &Scope, discovery: &mut Discovery) {
        for stmt in named_children(block) {
            let (decorators, def) = unwrap_decorated(stmt, src);
            match def.kind() {
                "function_definition" => {
                    if scope.collects && self.is_test_function(def, src) {
                        discovery.insert(self.build_test(
                            def,
                            &decorators,
                            scope.class_path(),
                            &scope.inherited,
                            src,
                        ));
                    }
                }
                "class_definition" => self.walk_class(def, &decorators, src, scope, discovery),
                kind if is_compound_block(kind) => self.walk_block(def, src, scope, discovery),
                _ => {}
            }
        }
    }

    fn walk_class(
        &self,
        def: Node,
        decorators: &[DecoratorExpr],
        src: &[u8],
        scope: &Scope,
        discovery: &mut Discovery,
    ) {
        let Some(body) = def.child_by_field_name("body") else {
            return;
        };
        let name = field_text(def, "name", src);
        let mut path = scope.path.clone();
        path.push(name.to_string());

        let is_test = self.is_test_class(name);
        let mut inherited = scope.inherited.clone();
        if is_test {
            inherited.extend(self.matcher.markers_of(decorators));
            inherited.extend(self.pytestmark_markers(body, src));
        }

        let inner = Scope {
            path,
            inherited,
            collects: is_test,
        };
        self.walk_block(body, src, &inner, discovery);
    }

    fn build_test(
        &self,
        def: Node,
        decorators: &[DecoratorExpr],
        class_path: Option<String>,
        inherited: &BTreeSet<String>,
        src: &[u8],
    ) -> DiscoveredTest {
        let mut markers = inherited.clone();
        markers.extend(self.matcher.markers_of(decorators));

        let mut cursor = def.walk();
        let is_async = def.children(&mut cursor).any(|c| c.kind() == "async");

        DiscoveredTest {
            name: field_text(def, "name", src).to_string(),
            class_path,
            line: def.start_position().row as u32 + 1,
            is_async,
            docstring: def.child_by_field_name("body").and_then(|b| docstring_of(b, src)),
            markers,
            decorators: decorators.to_vec(),
        }
    }

    fn is_test_function(&self, def: Node, src: &[u8]) -> bool {
        field_text(def, "name", src).starts_with(self.function_prefix)
    }

    fn is_test_class(&self, name: &str) -> bool {
        name.contains(self.class_marker) || name.starts_with(self.class_prefix)
    }

    /// Markers from `pytestmark = ...` statements directly inside `block`.
    fn pytestmark_markers(&self, block: Node, src: &[u8]) -> BTreeSet<String> {
        let mut markers = BTreeSet::new();
        for stmt in named_children(block) {
            if stmt.kind() != "expression_statement" {
                continue;
            }
            for assignment in named_children(stmt) {
                if assignment.kind() != "assignment" {
                    continue;
                }
                let target = assignment.child_by_field_name("left");
                if target.map(|t| node_text(t, src)) != Some(PYTESTMARK) {
                    continue;
                }
                let Some(value) = assignment.child_by_field_name("right") else {
                    continue;
                };
                let elements = match value.kind() {
                    "list" | "tuple" => named_children(value),
                    _ => vec![value],
                };
                let lowered: Vec<DecoratorExpr> =
                    elements.into_iter().map(|e| lower_expr(e, src)).collect();
                markers.extend(self.matcher.markers_of(&lowered));
            }
        }
        markers
    }
}

fn parse_tree(source: &str, path: &str) -> Result<Tree, ParseError> {
    PYTHON_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            let mut parser = Parser::new();
            parser
                .set_language(&tree_sitter_python::LANGUAGE.into())
                .map_err(|e| ParseError::GrammarUnavailable {
                    message: e.to_string(),
                })?;
            *slot = Some(parser);
        }
        let Some(parser) = slot.as_mut() else {
            return Err(ParseError::GrammarUnavailable {
                message: "parser slot empty".to_string(),
            });
        };
        parser
            .parse(source, None)
            .ok_or_else(|| ParseError::NoTree { path: path.into() })
    })
}

/// Split a `decorated_definition` into its lowered decorators and definition.
fn unwrap_decorated<'t>(node: Node<'t>, src: &[u8]) -> (Vec<DecoratorExpr>, Node<'t>) {
    if node.kind() != "decorated_definition" {
        return (Vec::new(), node);
    }
    let Some(definition) = node.child_by_field_name("definition") else {
        return (Vec::new(), node);
    };
    let decorators = named_children(node)
        .into_iter()
        .filter(|c| c.kind() == "decorator")
        .filter_map(|d| named_children(d).into_iter().next())
        .map(|expr| lower_expr(expr, src))
        .collect();
    (decorators, definition)
}

/// Named children, comments excluded.
fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

/// Statements whose blocks still belong to the enclosing scope.
fn is_compound_block(kind: &str) -> bool {
    matches!(
        kind,
        "if_statement"
            | "elif_clause"
            | "else_clause"
            | "try_statement"
            | "except_clause"
            | "except_group_clause"
            | "finally_clause"
            | "with_statement"
            | "block"
    )
}

fn node_text<'s>(node: Node, src: &'s [u8]) -> &'s str {
    node.utf8_text(src).unwrap_or("")
}

fn field_text<'s>(node: Node, field: &str, src: &'s [u8]) -> &'s str {
    node.child_by_field_name(field)
        .map(|n| node_text(n, src))
        .unwrap_or("")
}

/// The docstring of a function body: a lone string literal as its first statement.
fn docstring_of(body: Node, src: &[u8]) -> Option<String> {
    let first = named_children(body).into_iter().next()?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let parts = named_children(first);
    let [literal] = parts.as_slice() else {
        return None;
    };
    let raw = match literal.kind() {
        "string" => docstring::literal_value(node_text(*literal, src))?,
        "concatenated_string" => {
            let mut joined = String::new();
            for piece in named_children(*literal) {
                joined.push_str(&docstring::literal_value(node_text(piece, src))?);
            }
            joined
        }
        _ => return None,
    };
    Some(docstring::clean(&raw))
}

/// Lower an expression node into the decorator pattern language.
pub(crate) fn lower_expr(node: Node, src: &[u8]) -> DecoratorExpr {
    match node.kind() {
        "identifier" => DecoratorExpr::Name(node_text(node, src).to_string()),
        "attribute" => match dotted_path(node, src) {
            Some(path) => DecoratorExpr::Attribute(path),
            None => DecoratorExpr::Other(node_text(node, src).to_string()),
        },
        "call" => {
            let Some(function) = node.child_by_field_name("function") else {
                return DecoratorExpr::Other(node_text(node, src).to_string());
            };
            let args = node
                .child_by_field_name("arguments")
                .map(|a| lower_args(a, src))
                .unwrap_or_default();
            DecoratorExpr::Call {
                callee: Box::new(lower_expr(function, src)),
                args,
            }
        }
        "parenthesized_expression" => match named_children(node).as_slice() {
            [inner] => lower_expr(*inner, src),
            _ => DecoratorExpr::Other(node_text(node, src).to_string()),
        },
        _ => DecoratorExpr::Other(node_text(node, src).to_string()),
    }
}

fn dotted_path(node: Node, src: &[u8]) -> Option<Vec<String>> {
    match node.kind() {
        "identifier" => Some(vec![node_text(node, src).to_string()]),
        "attribute" => {
            let mut path = dotted_path(node.child_by_field_name("object")?, src)?;
            path.push(field_text(node, "attribute", src).to_string());
            Some(path)
        }
        _ => None,
    }
}

fn lower_args(arguments: Node, src: &[u8]) -> SmallVec4<CallArg> {
    if arguments.kind() != "argument_list" {
        // `f(x for x in xs)`: a bare generator is the only argument.
        return SmallVec4::from_iter([CallArg::Positional(ArgValue::Opaque)]);
    }
    named_children(arguments)
        .into_iter()
        .map(|arg| match arg.kind() {
            "keyword_argument" => CallArg::Keyword {
                name: field_text(arg, "name", src).to_string(),
                value: arg
                    .child_by_field_name("value")
                    .map_or(ArgValue::Opaque, lower_value),
            },
            "list_splat" | "dictionary_splat" => CallArg::Splat,
            _ => CallArg::Positional(lower_value(arg)),
        })
        .collect()
}

/// Literal list/tuple lengths; everything else is opaque.
fn lower_value(node: Node) -> ArgValue {
    match node.kind() {
        "list" | "tuple" => {
            let elements = named_children(node);
            let unpacks = elements
                .iter()
                .any(|e| matches!(e.kind(), "list_splat" | "parenthesized_list_splat"));
            if unpacks {
                ArgValue::Opaque
            } else {
                ArgValue::Sequence {
                    len: elements.len(),
                }
            }
        }
        "parenthesized_expression" => match named_children(node).as_slice() {
            [inner] => lower_value(*inner),
            _ => ArgValue::Opaque,
        },
        _ => ArgValue::Opaque,
    }
}
