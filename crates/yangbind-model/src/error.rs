use thiserror::Error;

/// Failures while building or loading a statement tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("duplicate module '{0}'")]
    DuplicateModule(String),

    #[error("unknown module '{0}'")]
    UnknownModule(String),

    #[error("unknown prefix '{prefix}' in module '{module}'")]
    UnknownPrefix { module: String, prefix: String },

    #[error("grouping {0} not found")]
    UnknownGrouping(String),

    #[error("groupings reference each other through uses: {0:?}")]
    CircularGrouping(Vec<String>),

    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("unknown builtin type '{0}'")]
    UnknownBuiltinType(String),

    #[error("statement {0} cannot contain children of kind {1}")]
    InvalidChild(String, String),

    #[error("malformed schema document: {0}")]
    Malformed(String),
}
