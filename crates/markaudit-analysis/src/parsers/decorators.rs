//! Marker recognition over lowered decorator expressions.
//!
//! Exactly three shapes name a category:
//! - `<ns>.mark.<category>` (attribute, no call)
//! - `<ns>.mark.<category>(...)` (the same attribute, called)
//! - `<category>` (a bare name equal to a known category, treated as an alias)
//!
//! Everything else is ignored.

use std::collections::BTreeSet;

use super::types::DecoratorExpr;
use crate::registry::CategoryRegistry;

#[derive(Debug, Clone, Copy)]
pub struct MarkerMatcher<'a> {
    registry: &'a CategoryRegistry,
    namespace: &'a str,
}

impl<'a> MarkerMatcher<'a> {
    pub fn new(registry: &'a CategoryRegistry, namespace: &'a str) -> Self {
        Self {
            registry,
            namespace,
        }
    }

    pub fn namespace(&self) -> &'a str {
        self.namespace
    }

    /// The category a single decorator names, if any.
    pub fn marker_of(&self, expr: &DecoratorExpr) -> Option<&'static str> {
        match expr {
            DecoratorExpr::Attribute(path) => self.mark_path(path),
            DecoratorExpr::Call { callee, .. } => match callee.as_ref() {
                DecoratorExpr::Attribute(path) => self.mark_path(path),
                _ => None,
            },
            DecoratorExpr::Name(name) => self.registry.get(name).map(|c| c.name),
            DecoratorExpr::Other(_) => None,
        }
    }

    /// All categories named by a decorator list.
    pub fn markers_of<'e>(
        &self,
        exprs: impl IntoIterator<Item = &'e DecoratorExpr>,
    ) -> BTreeSet<String> {
        exprs
            .into_iter()
            .filter_map(|e| self.marker_of(e))
            .map(str::to_string)
            .collect()
    }

    /// `<ns>.mark.<name>` where `<name>` is a known category.
    fn mark_path(&self, path: &[String]) -> Option<&'static str> {
        match path {
            [ns, mark, category] if ns == self.namespace && mark == "mark" => {
                self.registry.get(category).map(|c| c.name)
            }
            _ => None,
        }
    }

    /// True for `<ns>.mark.<attr>` with the given attribute, called.
    pub fn is_mark_call(&self, expr: &DecoratorExpr, attr: &str) -> bool {
        match expr {
            DecoratorExpr::Call { callee, .. } => matches!(
                callee.as_ref(),
                DecoratorExpr::Attribute(path)
                    if matches!(path.as_slice(), [ns, mark, a] if ns == self.namespace && mark == "mark" && a == attr)
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::types::{ArgValue, CallArg};
    use smallvec::smallvec;

    fn call(path: &[&str]) -> DecoratorExpr {
        DecoratorExpr::Call {
            callee: Box::new(DecoratorExpr::attribute(path)),
            args: smallvec![CallArg::Positional(ArgValue::Opaque)],
        }
    }

    #[test]
    fn attribute_shape() {
        let registry = CategoryRegistry::builtin();
        let m = MarkerMatcher::new(&registry, "pytest");
        assert_eq!(m.marker_of(&DecoratorExpr::attribute(&["pytest", "mark", "unit"])), Some("unit"));
        assert_eq!(m.marker_of(&DecoratorExpr::attribute(&["pytest", "mark", "asyncio"])), None);
        assert_eq!(m.marker_of(&DecoratorExpr::attribute(&["other", "mark", "unit"])), None);
        assert_eq!(m.marker_of(&DecoratorExpr::attribute(&["mark", "unit"])), None);
    }

    #[test]
    fn call_shape() {
        let registry = CategoryRegistry::builtin();
        let m = MarkerMatcher::new(&registry, "pytest");
        assert_eq!(m.marker_of(&call(&["pytest", "mark", "slow"])), Some("slow"));
        assert_eq!(m.marker_of(&call(&["pytest", "mark", "parametrize"])), None);
    }

    #[test]
    fn bare_name_alias() {
        let registry = CategoryRegistry::builtin();
        let m = MarkerMatcher::new(&registry, "pytest");
        assert_eq!(m.marker_of(&DecoratorExpr::Name("integration".into())), Some("integration"));
        assert_eq!(m.marker_of(&DecoratorExpr::Name("fixture".into())), None);
        assert_eq!(m.marker_of(&DecoratorExpr::Other("lambda f: f".into())), None);
    }

    #[test]
    fn custom_namespace() {
        let registry = CategoryRegistry::builtin();
        let m = MarkerMatcher::new(&registry, "pt");
        assert_eq!(m.marker_of(&DecoratorExpr::attribute(&["pt", "mark", "e2e"])), Some("e2e"));
        assert_eq!(m.marker_of(&DecoratorExpr::attribute(&["pytest", "mark", "e2e"])), None);
    }

    #[test]
    fn mark_call_detection() {
        let registry = CategoryRegistry::builtin();
        let m = MarkerMatcher::new(&registry, "pytest");
        assert!(m.is_mark_call(&call(&["pytest", "mark", "parametrize"]), "parametrize"));
        assert!(!m.is_mark_call(&DecoratorExpr::attribute(&["pytest", "mark", "parametrize"]), "parametrize"));
        assert!(!m.is_mark_call(&call(&["parametrize"]), "parametrize"));
    }
}
