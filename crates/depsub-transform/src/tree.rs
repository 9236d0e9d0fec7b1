//! Small tree-sitter node helpers.

use tree_sitter::Node;

/// Source text covered by `node`.
pub(crate) fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

/// Named children, collected up front (cursor iteration borrows mutably).
pub(crate) fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .collect()
}

/// All children, comments excluded.
pub(crate) fn significant_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    (0..node.child_count())
        .filter_map(|i| node.child(i))
        .filter(|c| c.kind() != "comment")
        .collect()
}
