//! Parametrize multiplier: how many concrete instances a declared test expands into.
//!
//! Stacked `parametrize` decorators multiply (cartesian product). Only literal
//! list/tuple argument values are sized; a name or comprehension contributes 1.

use crate::parsers::types::{ArgValue, CallArg, DecoratorExpr};
use crate::parsers::MarkerMatcher;

const PARAMETRIZE: &str = "parametrize";
const ARGVALUES: &str = "argvalues";

/// Instance count for one function's decorator list. Always at least 1.
pub fn count_instances(decorators: &[DecoratorExpr], matcher: &MarkerMatcher<'_>) -> u64 {
    decorators
        .iter()
        .filter(|d| matcher.is_mark_call(d, PARAMETRIZE))
        .map(multiplier)
        .fold(1u64, u64::saturating_mul)
}

fn multiplier(decorator: &DecoratorExpr) -> u64 {
    match argvalues(decorator) {
        // An empty list still collects one (skipped) instance.
        Some(ArgValue::Sequence { len }) => (len as u64).max(1),
        _ => 1,
    }
}

/// Second positional argument, or the `argvalues=` keyword.
fn argvalues(decorator: &DecoratorExpr) -> Option<ArgValue> {
    if let Some(value) = decorator.positional_args().get(1) {
        return Some(**value);
    }
    let DecoratorExpr::Call { args, .. } = decorator else {
        return None;
    };
    args.iter().find_map(|a| match a {
        CallArg::Keyword { name, value } if name == ARGVALUES => Some(*value),
        _ => None,
    })
}
