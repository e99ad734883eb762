//! Explicit three-value type for optional feature flags.
//!
//! This module provides the [`TriState`] type used for settings that may be
//! explicitly enabled, explicitly disabled, or left unset so that a
//! higher-level default (or the live value on GitHub) applies.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "tri_state_tests.rs"]
mod tests;

/// A flag that is explicitly on, explicitly off, or not specified.
///
/// Using an explicit enumeration instead of a nullable boolean keeps the
/// "unset" case visible at mutation-construction time: an unset flag is
/// omitted from the API call rather than silently sent as `false`.
///
/// In configuration files the three states are written as `true`, `false`,
/// or by leaving the key out entirely.
///
/// # Examples
///
/// ```rust
/// use config_manager::TriState;
///
/// let repo_level = TriState::Unset;
/// let org_default = TriState::Enabled;
///
/// // Repository-level settings win, unset falls back to the default.
/// assert_eq!(repo_level.or(org_default), TriState::Enabled);
/// assert_eq!(TriState::Disabled.or(org_default), TriState::Disabled);
///
/// // Unset stays unset when there is no default either.
/// assert!(TriState::Unset.or(TriState::Unset).as_bool().is_none());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum TriState {
    /// No value specified at this level.
    #[default]
    Unset,

    /// Explicitly enabled.
    Enabled,

    /// Explicitly disabled.
    Disabled,
}

impl TriState {
    /// Returns `true` only for an explicitly enabled flag.
    pub fn is_enabled(&self) -> bool {
        matches!(self, TriState::Enabled)
    }

    /// Returns `true` when no value was specified.
    pub fn is_unset(&self) -> bool {
        matches!(self, TriState::Unset)
    }

    /// Returns `true` when the flag carries an explicit value.
    pub fn is_set(&self) -> bool {
        !self.is_unset()
    }

    /// Falls back to `default` when this flag is unset.
    pub fn or(self, default: TriState) -> TriState {
        if self.is_unset() {
            default
        } else {
            self
        }
    }

    /// Converts to an optional boolean, mapping `Unset` to `None`.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            TriState::Unset => None,
            TriState::Enabled => Some(true),
            TriState::Disabled => Some(false),
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::Enabled
        } else {
            TriState::Disabled
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => TriState::Unset,
            Some(v) => TriState::from(v),
        }
    }
}

impl From<TriState> for Option<bool> {
    fn from(value: TriState) -> Self {
        value.as_bool()
    }
}
