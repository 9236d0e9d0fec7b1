//! Human-readable labels for registry keys.
//!
//! Labels exist only for error messages: when resolution fails, the
//! message names the key the way a developer would. Classification
//! happens at key construction (the explicit-token approach), never by
//! inspecting values at lookup time.

use crate::value::Value;
use std::fmt;

/// Source lines kept when labeling an anonymous function.
const SNIPPET_LINES: usize = 3;

/// Classified display label for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolLabel {
    /// A display string names itself
    Literal(String),
    /// An object instance, labeled by its type
    Instance(String),
    /// A named function
    NamedFunction(String),
    /// An anonymous function, labeled by its leading source text
    AnonymousFunction(String),
}

impl SymbolLabel {
    /// Instance label for a concrete type, shortened to the last path
    /// segment: `Instance of QueryService`.
    #[must_use]
    pub fn instance<T: ?Sized>() -> Self {
        Self::Instance(short_type_name(std::any::type_name::<T>()).to_owned())
    }

    /// Anonymous-function label, truncated to the first few lines of the
    /// function's source text.
    pub fn anonymous(source: impl Into<String>) -> Self {
        let source = source.into();
        let snippet: Vec<&str> = source.lines().take(SNIPPET_LINES).collect();
        Self::AnonymousFunction(snippet.join("\n"))
    }

    /// Classify an arbitrary runtime value: display strings name
    /// themselves, everything else is an instance of its type.
    #[must_use]
    pub fn for_value(value: &Value) -> Self {
        if let Some(text) = value.downcast_ref::<String>() {
            return Self::Literal(text.clone());
        }
        if let Some(text) = value.downcast_ref::<&str>() {
            return Self::Literal((*text).to_owned());
        }
        Self::Instance(short_type_name(value.type_name()).to_owned())
    }
}

impl fmt::Display for SymbolLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "{text}"),
            Self::Instance(ty) => write!(f, "Instance of {ty}"),
            Self::NamedFunction(name) => write!(f, "{name}"),
            Self::AnonymousFunction(snippet) => write!(f, "Anonymous Function ({snippet})"),
        }
    }
}

/// Last segment of a (possibly generic) type path.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct QueryService;

    #[test]
    fn literal_names_itself() {
        assert_eq!(SymbolLabel::Literal("fetch".to_owned()).to_string(), "fetch");
    }

    #[test]
    fn instance_label_uses_short_type_name() {
        let label = SymbolLabel::instance::<QueryService>();
        assert_eq!(label.to_string(), "Instance of QueryService");
    }

    #[test]
    fn named_function_label() {
        let label = SymbolLabel::NamedFunction("callApi".to_owned());
        assert_eq!(label.to_string(), "callApi");
    }

    #[test]
    fn anonymous_label_truncates_to_three_lines() {
        let label = SymbolLabel::anonymous("(a, b) => {\n  a();\n  b();\n  done();\n}");
        let rendered = label.to_string();
        assert!(rendered.starts_with("Anonymous Function ((a, b) => {"));
        assert!(rendered.contains("a();"));
        assert!(!rendered.contains("done()"));
    }

    #[test]
    fn value_classification() {
        assert_eq!(
            SymbolLabel::for_value(&Value::new("fetch".to_owned())).to_string(),
            "fetch"
        );
        assert_eq!(
            SymbolLabel::for_value(&Value::new(QueryService)).to_string(),
            "Instance of QueryService"
        );
    }

    #[test]
    fn generic_types_shorten_to_the_outer_name() {
        assert_eq!(short_type_name("alloc::vec::Vec<alloc::string::String>"), "Vec");
    }
}
