//! Error types for the commons UI core library.

use thiserror::Error;

/// Errors that can occur in the UI core.
///
/// Variants carry plain string messages so they cross the WASM boundary
/// without losing information.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    /// Error serializing/deserializing JSON
    #[error("JSON error: {0}")]
    JsonError(String),

    /// A translation bundle could not be loaded
    #[error("Translation backend error: {0}")]
    Backend(String),

    /// The pending-changes indicator failed to render
    #[error("Render error: {0}")]
    Render(String),

    /// General error
    #[error("Error: {0}")]
    General(String),
}

impl From<serde_json::Error> for UiError {
    fn from(err: serde_json::Error) -> Self {
        UiError::JsonError(err.to_string())
    }
}

/// Result type alias for UI core operations.
pub type UiResult<T> = Result<T, UiError>;
