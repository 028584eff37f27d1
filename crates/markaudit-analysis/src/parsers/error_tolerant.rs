//! Syntax error detection over tree-sitter trees.

use tree_sitter::Node;

/// Zero-based position of an ERROR or MISSING node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPosition {
    pub row: u32,
    pub column: u32,
}

/// Count ERROR and MISSING nodes, returning their positions in tree order.
pub fn count_errors(root: Node) -> (u32, Vec<ErrorPosition>) {
    let mut count = 0u32;
    let mut positions = Vec::new();
    collect_errors(root, &mut count, &mut positions);
    (count, positions)
}

fn collect_errors(node: Node, count: &mut u32, positions: &mut Vec<ErrorPosition>) {
    if node.is_error() || node.is_missing() {
        *count += 1;
        let start = node.start_position();
        positions.push(ErrorPosition {
            row: start.row as u32,
            column: start.column as u32,
        });
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_errors(child, count, positions);
    }
}
