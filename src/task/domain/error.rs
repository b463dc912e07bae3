//! Error types for canonical vocabulary parsing.

use thiserror::Error;

/// Error returned when a string does not name a member of a canonical
/// vocabulary (status category, priority, task type, board type).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {vocabulary}: {value}")]
pub struct ParseVocabularyError {
    /// Name of the vocabulary being parsed.
    pub vocabulary: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseVocabularyError {
    pub(crate) fn new(vocabulary: &'static str, value: &str) -> Self {
        Self {
            vocabulary,
            value: value.to_owned(),
        }
    }
}
