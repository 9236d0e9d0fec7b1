//! Structural equivalence between syntax subtrees.
//!
//! Reference sites are found by shape, not identity: two subtrees are
//! equivalent when their normalized kinds match and every significant
//! child matches pairwise, down to identical token text at the leaves.
//! Comments and surrounding formatting never participate.

use crate::tree::{node_text, significant_children};
use tree_sitter::Node;

/// Normalized node kind. A shorthand object property references the same
/// binding a bare identifier does, so the two compare equal.
fn kind_of(node: Node<'_>) -> &'static str {
    match node.kind() {
        "shorthand_property_identifier" | "shorthand_property_identifier_pattern" => "identifier",
        kind => kind,
    }
}

/// True when `a` and `b` cover subtrees of the same shape and token text.
pub(crate) fn equivalent(a: Node<'_>, b: Node<'_>, source: &str) -> bool {
    if kind_of(a) != kind_of(b) {
        return false;
    }
    let a_children = significant_children(a);
    let b_children = significant_children(b);
    if a_children.is_empty() && b_children.is_empty() {
        return node_text(a, source) == node_text(b, source);
    }
    a_children.len() == b_children.len()
        && a_children
            .iter()
            .zip(&b_children)
            .all(|(x, y)| equivalent(*x, *y, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::{Parser, Tree};

    fn parse(source: &str) -> Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    /// All nodes of `kind`, in document order.
    fn nodes_of_kind<'t>(tree: &'t Tree, kind: &str) -> Vec<Node<'t>> {
        let mut found = Vec::new();
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            if node.kind() == kind {
                found.push(node);
            }
            for i in (0..node.child_count()).rev() {
                if let Some(child) = node.child(i) {
                    stack.push(child);
                }
            }
        }
        found
    }

    #[test]
    fn identical_member_accesses_match() {
        let source = "mailer.send; mailer.send;";
        let tree = parse(source);
        let members = nodes_of_kind(&tree, "member_expression");
        assert_eq!(members.len(), 2);
        assert!(equivalent(members[0], members[1], source));
    }

    #[test]
    fn different_properties_do_not_match() {
        let source = "mailer.send; mailer.close;";
        let tree = parse(source);
        let members = nodes_of_kind(&tree, "member_expression");
        assert!(!equivalent(members[0], members[1], source));
    }

    #[test]
    fn optional_chain_differs_from_plain_access() {
        let source = "mailer.send; mailer?.send;";
        let tree = parse(source);
        let members = nodes_of_kind(&tree, "member_expression");
        assert_eq!(members.len(), 2);
        assert!(!equivalent(members[0], members[1], source));
    }

    #[test]
    fn subscripts_compare_by_index() {
        let source = "list[0]; list[0]; list[1];";
        let tree = parse(source);
        let subs = nodes_of_kind(&tree, "subscript_expression");
        assert_eq!(subs.len(), 3);
        assert!(equivalent(subs[0], subs[1], source));
        assert!(!equivalent(subs[0], subs[2], source));
    }

    #[test]
    fn shorthand_property_matches_identifier() {
        let source = "x = { fetch }; fetch;";
        let tree = parse(source);
        let shorthand = nodes_of_kind(&tree, "shorthand_property_identifier");
        let idents = nodes_of_kind(&tree, "identifier");
        let plain = idents
            .iter()
            .find(|n| node_text(**n, source) == "fetch")
            .copied()
            .unwrap();
        assert_eq!(shorthand.len(), 1);
        assert!(equivalent(shorthand[0], plain, source));
    }

    #[test]
    fn comments_are_ignored() {
        let source = "obj /* a */ .send; obj.send;";
        let tree = parse(source);
        let members = nodes_of_kind(&tree, "member_expression");
        assert_eq!(members.len(), 2);
        assert!(equivalent(members[0], members[1], source));
    }
}
