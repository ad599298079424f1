//! Token-layer error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    /// A `{...}` reference names a path with no token behind it.
    #[error("unknown token reference {{{reference}}}")]
    UnknownReference { reference: String },

    /// Reference resolution revisited a node; names the first repeat.
    #[error("token reference cycle through {{{at}}}")]
    ReferenceCycle { at: String },

    #[error("failed to read token file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid token JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid token YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document parsed but its root is not an object.
    #[error("token file root must be an object")]
    NotAnObject,
}
