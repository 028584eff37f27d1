//! Parser output types.
//!
//! Decorators are lowered from the concrete syntax tree into a small
//! tagged-variant form so marker and parametrize recognition can be written
//! as structural matches instead of node-kind string checks.

use std::collections::BTreeSet;

use markaudit_core::types::collections::SmallVec4;
use serde::{Deserialize, Serialize};

/// Lowered decorator (or `pytestmark` element) expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecoratorExpr {
    /// `@unit`
    Name(String),
    /// `@pytest.mark.unit`, segments in source order.
    Attribute(Vec<String>),
    /// `@pytest.mark.parametrize("x", [1, 2])`
    Call {
        callee: Box<DecoratorExpr>,
        args: SmallVec4<CallArg>,
    },
    /// Anything else, kept as raw source text.
    Other(String),
}

impl DecoratorExpr {
    pub fn attribute(path: &[&str]) -> Self {
        Self::Attribute(path.iter().map(|s| s.to_string()).collect())
    }

    /// Positional arguments of a call, in order. Empty for non-calls.
    pub fn positional_args(&self) -> Vec<&ArgValue> {
        match self {
            Self::Call { args, .. } => args
                .iter()
                .filter_map(|a| match a {
                    CallArg::Positional(v) => Some(v),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    Positional(ArgValue),
    Keyword { name: String, value: ArgValue },
    /// `*args` or `**kwargs`
    Splat,
}

/// What the parser can tell about an argument without data-flow analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgValue {
    /// A list or tuple literal with `len` elements and no unpacking.
    Sequence { len: usize },
    /// A name, comprehension, call, or any other expression.
    Opaque,
}

/// One test function or method found in a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredTest {
    pub name: String,
    /// Enclosing class chain, `Outer::Inner`; `None` at module scope.
    pub class_path: Option<String>,
    /// 1-based line of the `def` keyword (or `async`).
    pub line: u32,
    pub is_async: bool,
    pub docstring: Option<String>,
    /// Category names, own and inherited.
    pub markers: BTreeSet<String>,
    /// The function's own decorators, outermost first.
    pub decorators: Vec<DecoratorExpr>,
}

/// A second declaration of an already-discovered test in the same scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateTest {
    pub name: String,
    pub class_path: Option<String>,
    pub line: u32,
    pub first_line: u32,
}

/// Parse output for one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedFile {
    /// Path relative to the audit root, `/`-separated.
    pub path: String,
    /// Tests ordered by declaration line.
    pub tests: Vec<DiscoveredTest>,
    pub duplicates: Vec<DuplicateTest>,
    pub parse_time_us: u64,
}
