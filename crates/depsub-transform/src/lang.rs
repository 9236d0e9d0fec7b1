//! Source dialect selection.

use tree_sitter::Language;

/// Supported source dialects.
///
/// The TypeScript grammar is a superset of JavaScript, so plain `.js`
/// sources parse under [`Lang::TypeScript`]; JSX-bearing sources need
/// [`Lang::Tsx`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lang {
    /// TypeScript / JavaScript
    #[default]
    TypeScript,
    /// TSX / JSX
    Tsx,
}

impl Lang {
    /// File extensions handled by this dialect
    #[inline]
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Lang::TypeScript => &["ts", "js", "mjs", "cjs", "mts", "cts"],
            Lang::Tsx => &["tsx", "jsx"],
        }
    }

    /// Human-readable name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Lang::TypeScript => "typescript",
            Lang::Tsx => "tsx",
        }
    }

    /// Pick the dialect for a file extension
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        [Lang::TypeScript, Lang::Tsx]
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext))
    }

    /// The tree-sitter grammar backing this dialect
    pub(crate) fn grammar(&self) -> Language {
        match self {
            Lang::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Lang::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_cover_js_and_ts() {
        assert!(Lang::TypeScript.extensions().contains(&"js"));
        assert!(Lang::TypeScript.extensions().contains(&"ts"));
        assert!(Lang::Tsx.extensions().contains(&"jsx"));
    }

    #[test]
    fn from_extension_round_trip() {
        assert_eq!(Lang::from_extension("mjs"), Some(Lang::TypeScript));
        assert_eq!(Lang::from_extension("tsx"), Some(Lang::Tsx));
        assert_eq!(Lang::from_extension("py"), None);
    }

    #[test]
    fn lang_name() {
        assert_eq!(Lang::TypeScript.name(), "typescript");
        assert_eq!(Lang::Tsx.name(), "tsx");
    }
}
