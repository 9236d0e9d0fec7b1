//! Lexical scope handling for reference rewriting.
//!
//! The rewrite is bounded to the marker's enclosing block scope. Within
//! that block, a name re-declared by a nested function, class, lexical
//! declaration, or catch parameter is a different binding and must not be
//! rewritten — tree-sitter has no binding resolver, so shadowing is
//! decided by walking the ancestor chain between a candidate reference
//! and the scope root.

use crate::tree::{named_children, node_text};
use tree_sitter::Node;

/// Node kinds that open a function scope.
const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "function_expression",
    "function",
    "generator_function",
    "generator_function_declaration",
    "arrow_function",
    "method_definition",
];

/// Nearest enclosing block scope: the closest `statement_block` ancestor,
/// or the program root.
pub(crate) fn enclosing_scope(node: Node<'_>) -> Node<'_> {
    let mut current = node;
    while let Some(parent) = current.parent() {
        if parent.kind() == "statement_block" || parent.kind() == "program" {
            return parent;
        }
        current = parent;
    }
    current
}

/// True when some scope strictly between `reference` and `scope` re-binds
/// `name`, making the reference a different binding than the injected one.
pub(crate) fn is_shadowed(reference: Node<'_>, name: &str, scope: Node<'_>, source: &str) -> bool {
    let mut current = reference;
    while let Some(parent) = current.parent() {
        if parent == scope {
            return false;
        }
        if binds_name(parent, name, source) {
            return true;
        }
        current = parent;
    }
    false
}

/// Does `node` introduce a binding for `name` in its own scope?
fn binds_name(node: Node<'_>, name: &str, source: &str) -> bool {
    let kind = node.kind();
    if FUNCTION_KINDS.contains(&kind) {
        if let Some(fn_name) = node.child_by_field_name("name") {
            if node_text(fn_name, source) == name {
                return true;
            }
        }
        return params_bind(node, name, source);
    }
    match kind {
        "statement_block" | "program" => block_binds(node, name, source),
        "catch_clause" => node
            .child_by_field_name("parameter")
            .is_some_and(|p| pattern_binds(p, name, source)),
        "class_declaration" | "class" => node
            .child_by_field_name("name")
            .is_some_and(|n| node_text(n, source) == name),
        "for_statement" => node
            .child_by_field_name("initializer")
            .is_some_and(|init| declaration_binds(init, name, source)),
        "for_in_statement" => node
            .child_by_field_name("left")
            .is_some_and(|left| pattern_binds(left, name, source)),
        _ => false,
    }
}

/// Any parameter of a function-like node binding `name`?
fn params_bind(func: Node<'_>, name: &str, source: &str) -> bool {
    if let Some(params) = func.child_by_field_name("parameters") {
        return named_children(params)
            .into_iter()
            .any(|p| pattern_binds(p, name, source));
    }
    // unparenthesized arrow parameter
    func.child_by_field_name("parameter")
        .is_some_and(|p| pattern_binds(p, name, source))
}

/// Declarations appearing directly in a block that bind `name`.
fn block_binds(block: Node<'_>, name: &str, source: &str) -> bool {
    named_children(block).into_iter().any(|statement| {
        match statement.kind() {
            "lexical_declaration" | "variable_declaration" => {
                declaration_binds(statement, name, source)
            }
            "function_declaration" | "generator_function_declaration" | "class_declaration" => {
                statement
                    .child_by_field_name("name")
                    .is_some_and(|n| node_text(n, source) == name)
            }
            _ => false,
        }
    })
}

/// Any declarator of a `var`/`let`/`const` declaration binding `name`?
fn declaration_binds(declaration: Node<'_>, name: &str, source: &str) -> bool {
    named_children(declaration)
        .into_iter()
        .filter(|d| d.kind() == "variable_declarator")
        .any(|d| {
            d.child_by_field_name("name")
                .is_some_and(|pattern| pattern_binds(pattern, name, source))
        })
}

/// Does a binding pattern introduce `name`? Default-value expressions are
/// not patterns and never bind.
fn pattern_binds(pattern: Node<'_>, name: &str, source: &str) -> bool {
    match pattern.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            node_text(pattern, source) == name
        }
        "assignment_pattern" => pattern
            .child_by_field_name("left")
            .is_some_and(|left| pattern_binds(left, name, source)),
        "pair_pattern" => pattern
            .child_by_field_name("value")
            .is_some_and(|value| pattern_binds(value, name, source)),
        "rest_pattern" => named_children(pattern)
            .into_iter()
            .any(|inner| pattern_binds(inner, name, source)),
        "object_pattern" | "array_pattern" => named_children(pattern)
            .into_iter()
            .any(|inner| pattern_binds(inner, name, source)),
        // TypeScript wraps each parameter in a (required|optional)_parameter
        "required_parameter" | "optional_parameter" => pattern
            .child_by_field_name("pattern")
            .is_some_and(|inner| pattern_binds(inner, name, source)),
        _ => false,
    }
}

/// True when `node` occupies a binding position (declarator name,
/// parameter, function/class name, import/export specifier) rather than a
/// reference position.
pub(crate) fn is_binding_position(node: Node<'_>) -> bool {
    let mut current = node;
    while let Some(parent) = current.parent() {
        let kind = parent.kind();
        if FUNCTION_KINDS.contains(&kind) {
            return parent.child_by_field_name("name") == Some(current)
                || parent.child_by_field_name("parameter") == Some(current);
        }
        match kind {
            "variable_declarator" => {
                return parent.child_by_field_name("name") == Some(current);
            }
            "formal_parameters" => return true,
            "assignment_pattern" => {
                // only the left side binds; the default value is an expression
                if parent.child_by_field_name("left") == Some(current) {
                    current = parent;
                } else {
                    return false;
                }
            }
            "object_pattern" | "array_pattern" | "rest_pattern" | "pair_pattern" => {
                current = parent;
            }
            "required_parameter" | "optional_parameter" => {
                // the pattern field binds; a default value is an expression
                if parent.child_by_field_name("pattern") == Some(current) {
                    current = parent;
                } else {
                    return false;
                }
            }
            "class_declaration" | "class" => {
                return parent.child_by_field_name("name") == Some(current);
            }
            "catch_clause" => {
                return parent.child_by_field_name("parameter") == Some(current);
            }
            "import_specifier" | "namespace_import" | "import_clause" | "export_specifier" => {
                return true;
            }
            _ => return false,
        }
    }
    false
}

/// Innermost base identifier of an expression: `mailer` for
/// `mailer.send`, `list` for `list[0]`, the identifier itself otherwise.
pub(crate) fn base_identifier<'s>(node: Node<'_>, source: &'s str) -> Option<&'s str> {
    let mut current = node;
    loop {
        match current.kind() {
            "identifier" | "shorthand_property_identifier" => {
                return Some(node_text(current, source));
            }
            "member_expression" | "subscript_expression" => {
                current = current.child_by_field_name("object")?;
            }
            _ => return None,
        }
    }
}
