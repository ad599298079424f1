//! Syntax-layer error type.

use thiserror::Error;

/// Errors from parser construction or query compilation.
///
/// Parse failures themselves are not errors at this layer; a failed parse
/// yields no tree and the affected region contributes nothing.
#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("grammar rejected by tree-sitter runtime: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("query failed to compile: {0}")]
    Query(#[from] tree_sitter::QueryError),
}
