//! Error types for the transform pass.

/// Errors produced while transforming a source unit.
///
/// Malformed marker calls are deliberately NOT an error: a
/// `dep.injectable(..)` call whose argument is not an object literal is
/// treated as "not a match" and passed through untouched, so unrelated
/// same-named calls never break a build.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The input source failed to parse. Fatal; propagated to the host
    /// pipeline unchanged.
    #[error("syntax error at line {line}, column {column}")]
    Syntax {
        /// 1-based line of the first unparseable construct
        line: usize,
        /// 1-based column of the first unparseable construct
        column: usize,
    },

    /// The grammar could not be loaded (tree-sitter ABI mismatch).
    #[error("grammar error: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    /// The parser returned no tree at all.
    #[error("parser produced no tree")]
    NoTree,
}

/// Result alias for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;
