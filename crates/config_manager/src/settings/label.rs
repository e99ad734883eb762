//! GitHub label configuration.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "label_tests.rs"]
mod tests;

/// A label reconciled onto managed repositories.
///
/// Labels are keyed exclusively by name (case-sensitive, unique within a
/// repository); a rename is indistinguishable from a delete plus a create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Label name.
    pub name: String,

    /// Label color (hex code without #).
    pub color: String,

    /// Label description.
    #[serde(default)]
    pub description: String,
}

impl LabelConfig {
    /// Creates a label with an empty description.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            description: String::new(),
        }
    }
}
