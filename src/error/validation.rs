use thiserror::Error;

/// A malformed or incomplete request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Summary.
    pub message: String,
    /// Individual failures, if more than one field was checked.
    pub errors: Vec<String>,
}

impl ValidationError {
    /// Creates a new [`ValidationError`].
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), errors: Vec::new() }
    }

    /// Attaches individual failures.
    pub fn with_errors(mut self, errors: impl IntoIterator<Item = String>) -> Self {
        self.errors.extend(errors);
        self
    }
}
