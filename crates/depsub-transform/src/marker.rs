//! Injection-site discovery.
//!
//! A marker is a call expression whose callee is exactly
//! `<registry>.injectable` and whose sole argument is an object literal,
//! standing alone as an expression statement. Anything else — extra
//! arguments, a non-literal argument, a different callee shape — is not a
//! match and passes through the transform untouched.

use crate::scope::enclosing_scope;
use crate::tree::{named_children, node_text};
use tree_sitter::Node;

/// One alias/original-expression pair from a marker's object literal.
#[derive(Debug, Clone)]
pub(crate) struct PropertyEntry<'t> {
    /// Alias key naming the entry in the generated namespace
    pub(crate) alias_span: std::ops::Range<usize>,
    /// The original expression subtree the alias stands for
    pub(crate) expr: Node<'t>,
}

/// One marker call plus its enclosing statement and block scope.
#[derive(Debug, Clone)]
pub(crate) struct InjectionSite<'t> {
    /// The expression statement holding the marker call
    pub(crate) statement: Node<'t>,
    /// The object-literal argument, carried into the generated code verbatim
    pub(crate) literal: Node<'t>,
    /// The block scope the rewrite is bounded to
    pub(crate) scope: Node<'t>,
    /// Ordered alias/expression pairs
    pub(crate) entries: Vec<PropertyEntry<'t>>,
}

impl<'t> PropertyEntry<'t> {
    /// Alias key text.
    pub(crate) fn alias<'s>(&self, source: &'s str) -> &'s str {
        &source[self.alias_span.clone()]
    }
}

/// All injection sites under `root`, in document order.
pub(crate) fn find_sites<'t>(
    root: Node<'t>,
    source: &str,
    registry: &str,
) -> Vec<InjectionSite<'t>> {
    let mut sites = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.kind() == "call_expression" {
            if let Some(site) = site_from_call(node, source, registry) {
                sites.push(site);
            }
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }
    sites
}

fn site_from_call<'t>(call: Node<'t>, source: &str, registry: &str) -> Option<InjectionSite<'t>> {
    let callee = call.child_by_field_name("function")?;
    if callee.kind() != "member_expression" {
        return None;
    }
    let object = callee.child_by_field_name("object")?;
    let property = callee.child_by_field_name("property")?;
    if object.kind() != "identifier" || node_text(object, source) != registry {
        return None;
    }
    if property.kind() != "property_identifier" || node_text(property, source) != "injectable" {
        return None;
    }

    let args = call.child_by_field_name("arguments")?;
    let arg_nodes: Vec<Node<'t>> = named_children(args)
        .into_iter()
        .filter(|n| n.kind() != "comment")
        .collect();
    let [literal] = arg_nodes[..] else {
        return None;
    };
    if literal.kind() != "object" {
        // documented leniency: a non-literal argument is not a match
        tracing::debug!("skipping marker with non-object argument");
        return None;
    }

    let statement = call.parent()?;
    if statement.kind() != "expression_statement" {
        return None;
    }

    Some(InjectionSite {
        statement,
        literal,
        scope: enclosing_scope(statement),
        entries: extract_entries(literal, source),
    })
}

/// Alias/expression pairs from the object literal. Spread elements,
/// methods and computed keys never become entries.
fn extract_entries<'t>(literal: Node<'t>, source: &str) -> Vec<PropertyEntry<'t>> {
    let mut entries = Vec::new();
    for property in named_children(literal) {
        match property.kind() {
            "pair" => {
                let (Some(key), Some(value)) = (
                    property.child_by_field_name("key"),
                    property.child_by_field_name("value"),
                ) else {
                    continue;
                };
                let alias_span = match key.kind() {
                    "property_identifier" => key.byte_range(),
                    "string" => match string_contents(key, source) {
                        Some(span) => span,
                        None => continue,
                    },
                    _ => continue,
                };
                entries.push(PropertyEntry {
                    alias_span,
                    expr: value,
                });
            }
            "shorthand_property_identifier" => entries.push(PropertyEntry {
                alias_span: property.byte_range(),
                expr: property,
            }),
            _ => {}
        }
    }
    entries
}

/// Byte span of a string literal's contents, quotes excluded.
fn string_contents(string: Node<'_>, source: &str) -> Option<std::ops::Range<usize>> {
    for child in named_children(string) {
        if child.kind() == "string_fragment" {
            return Some(child.byte_range());
        }
    }
    // empty string literal: nothing between the quotes
    let range = string.byte_range();
    (range.len() >= 2).then(|| range.start + 1..range.end - 1)
}
