//! The transform pass: marker elimination and reference rewriting.

use crate::edit::EditSet;
use crate::equivalence::equivalent;
use crate::error::{TransformError, TransformResult};
use crate::lang::Lang;
use crate::marker::{find_sites, InjectionSite};
use crate::namespace::{next_namespace, NAMESPACE_PREFIX};
use crate::scope::{base_identifier, is_binding_position, is_shadowed};
use crate::tree::node_text;
use tree_sitter::{Node, Parser};

/// Options for a transform pass.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    registry_ident: String,
    lang: Lang,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            registry_ident: "dep".to_owned(),
            lang: Lang::default(),
        }
    }
}

impl TransformOptions {
    /// Default options: registry identifier `dep`, TypeScript grammar.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different registry identifier (`<ident>.injectable` markers,
    /// `<ident>.multi` in generated code).
    #[must_use]
    pub fn with_registry_ident(mut self, ident: impl Into<String>) -> Self {
        self.registry_ident = ident.into();
        self
    }

    /// Parse with a specific dialect.
    #[must_use]
    pub fn with_lang(mut self, lang: Lang) -> Self {
        self.lang = lang;
        self
    }

    /// The registry identifier markers hang off.
    #[inline]
    #[must_use]
    pub fn registry_ident(&self) -> &str {
        &self.registry_ident
    }

    /// The dialect sources are parsed as.
    #[inline]
    #[must_use]
    pub fn lang(&self) -> Lang {
        self.lang
    }
}

/// A configured transform pass.
///
/// Stateless apart from its options; the namespace counter lives at
/// process level, so any number of `Transformer`s can run concurrently
/// without sites colliding.
#[derive(Debug, Default)]
pub struct Transformer {
    options: TransformOptions,
}

impl Transformer {
    /// Build a pass from options.
    #[inline]
    #[must_use]
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }

    /// Transform one source unit.
    ///
    /// Files with no marker come back byte-identical. A file that does not
    /// parse is a fatal [`TransformError::Syntax`].
    pub fn transform(&self, source: &str) -> TransformResult<String> {
        // cheap short-circuit: no marker can possibly be present
        if !source.contains("injectable") {
            return Ok(source.to_owned());
        }

        let mut parser = Parser::new();
        parser.set_language(&self.options.lang.grammar())?;
        let tree = parser.parse(source, None).ok_or(TransformError::NoTree)?;
        let root = tree.root_node();
        if root.has_error() {
            let (line, column) = first_error_position(root);
            return Err(TransformError::Syntax { line, column });
        }

        let sites = find_sites(root, source, &self.options.registry_ident);
        if sites.is_empty() {
            return Ok(source.to_owned());
        }
        tracing::debug!(sites = sites.len(), "rewriting injection sites");

        let mut edits = EditSet::new();

        // Claim every marker statement first: replacing it with the batch
        // resolution also shields its object literal from the reference
        // walk below, which keeps the generated multi() argument intact.
        let mut namespaces = Vec::with_capacity(sites.len());
        for site in &sites {
            let namespace = next_namespace();
            let declaration = format!(
                // `var` so the binding hoists like the one it replaces
                "var {namespace} = {}.multi({});",
                self.options.registry_ident,
                node_text(site.literal, source),
            );
            edits.push(site.statement.byte_range(), declaration);
            namespaces.push(namespace);
        }

        for (site, namespace) in sites.iter().zip(&namespaces) {
            rewrite_references(site, namespace, source, &mut edits);
        }

        Ok(edits.apply(source))
    }
}

/// Rewrite every reference site within the site's block scope.
fn rewrite_references(
    site: &InjectionSite<'_>,
    namespace: &str,
    source: &str,
    edits: &mut EditSet,
) {
    rewrite_walk(site.scope, site, namespace, source, edits);
}

fn rewrite_walk(
    node: Node<'_>,
    site: &InjectionSite<'_>,
    namespace: &str,
    source: &str,
    edits: &mut EditSet,
) {
    if let Some(replacement) = rewrite_for(node, site, namespace, source) {
        // an overlapping push means the span belongs to a marker statement
        // or was claimed by an earlier site; either way it stays theirs
        edits.push(node.byte_range(), replacement);
        return;
    }
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            rewrite_walk(child, site, namespace, source, edits);
        }
    }
}

/// Replacement text for `node` if it is a reference site of `site`.
fn rewrite_for(
    node: Node<'_>,
    site: &InjectionSite<'_>,
    namespace: &str,
    source: &str,
) -> Option<String> {
    let kind = node.kind();
    let candidate = matches!(
        kind,
        "identifier" | "shorthand_property_identifier" | "member_expression" | "subscript_expression"
    );
    if !candidate {
        return None;
    }
    // own generated identifiers are never rewritten
    if kind == "identifier" && node_text(node, source).starts_with(NAMESPACE_PREFIX) {
        return None;
    }

    let entry = site
        .entries
        .iter()
        .find(|entry| equivalent(node, entry.expr, source))?;

    if kind == "identifier" && is_binding_position(node) {
        return None;
    }
    if let Some(base) = base_identifier(node, source) {
        if is_shadowed(node, base, site.scope, source) {
            return None;
        }
    }

    let access = format!("{namespace}['{}']", entry.alias(source));
    Some(if kind == "shorthand_property_identifier" {
        // `{ fetch }` becomes `{ fetch: ns['fetch'] }`
        format!("{}: {access}", node_text(node, source))
    } else {
        access
    })
}

/// Position of the first error or missing node, 1-based.
fn first_error_position(root: Node<'_>) -> (usize, usize) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let point = node.start_position();
            return (point.row + 1, point.column + 1);
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }
    (1, 1)
}

/// Transform `source` with default options.
///
/// Convenience entry point for host pipelines that process one file at a
/// time; equivalent to `Transformer::new(TransformOptions::new())`.
pub fn transform(source: &str) -> TransformResult<String> {
    Transformer::default().transform(source)
}
