//! Configuration error types.
//!
//! Domain-specific errors for validating the declarative governance model
//! before any API call is made.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// A single violated validation rule.
///
/// Identifies the first rule a configuration breaks: the offending field, the
/// value it carried, and a human-readable message. Validation stops at the
/// first violation so callers always see the highest-priority problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("configuration validation failed for field '{field}' with value '{value}': {message}")]
pub struct ValidationError {
    /// Path of the field that failed validation, e.g. `push_allowlist[2]`.
    pub field: String,

    /// The offending value, rendered for display.
    pub value: String,

    /// What the rule requires.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error for `field` carrying `value`.
    pub fn new(
        field: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}
