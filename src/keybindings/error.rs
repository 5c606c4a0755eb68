//! Error types for binding construction and dispatch.

use thiserror::Error;

/// A binding could not be constructed from the given options.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid binding: `key` must be a non-empty string")]
    EmptyKey,

    #[error("invalid binding: `action` must be provided")]
    MissingAction,
}

impl ValidationError {
    /// Name of the offending option.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyKey => "key",
            ValidationError::MissingAction => "action",
        }
    }
}

/// Errors surfaced while registering or dispatching bindings.
#[derive(Error, Debug)]
pub enum KeybindError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Dispatch was asked to run a key with no registered bindings.
    #[error("undefined keybind for key \"{key}\"")]
    Lookup { key: String },

    /// A bound action returned an error; the dispatch pass was aborted.
    #[error("action bound to \"{key}\" failed: {source}")]
    Action {
        key: String,
        #[source]
        source: anyhow::Error,
    },
}
