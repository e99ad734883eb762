//! Per-repository configuration and organization-level defaults.

use crate::TriState;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;

/// Configuration for a single repository.
///
/// Feature flags are tri-state: an unset flag falls back to the
/// organization-level default and, failing that, is omitted from the mutation
/// entirely so the live value is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Repository name (without the owner).
    pub name: String,

    /// Whether the wiki is enabled.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub wiki: TriState,

    /// Whether issues are enabled.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub issues: TriState,

    /// Whether projects are enabled.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub projects: TriState,

    /// The default branch name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,

    /// Whether the repository is private.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub private: TriState,

    /// Whether the repository is archived.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub archived: TriState,

    /// Whether the repository is a template repository.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub template: TriState,

    /// Repository description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Repository homepage URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    /// Delete head branches automatically after merge.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub delete_branch_on_merge: TriState,

    /// Whether discussions are enabled.
    #[serde(
        default,
        rename = "discussions_enabled",
        skip_serializing_if = "TriState::is_unset"
    )]
    pub discussions: TriState,
}

impl RepositoryConfig {
    /// Creates a configuration for `name` with every setting unset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Resolves effective feature flags against the organization defaults.
    ///
    /// Repository-level values win; flags set at neither level stay unset.
    pub fn effective_features(&self, defaults: Option<&RepositoryDefaults>) -> EffectiveFeatures {
        match defaults {
            Some(d) => EffectiveFeatures {
                wiki: self.wiki.or(d.wiki),
                issues: self.issues.or(d.issues),
                projects: self.projects.or(d.projects),
                delete_branch_on_merge: self.delete_branch_on_merge.or(d.delete_branch_on_merge),
            },
            None => EffectiveFeatures {
                wiki: self.wiki,
                issues: self.issues,
                projects: self.projects,
                delete_branch_on_merge: self.delete_branch_on_merge,
            },
        }
    }
}

/// Organization-level defaults for repository features.
///
/// Applied to every repository that does not set the flag itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryDefaults {
    /// Default wiki setting.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub wiki: TriState,

    /// Default issues setting.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub issues: TriState,

    /// Default projects setting.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub projects: TriState,

    /// Default delete-branch-on-merge setting.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub delete_branch_on_merge: TriState,
}

/// Feature flags after repository-over-default resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectiveFeatures {
    /// Resolved wiki flag.
    pub wiki: TriState,
    /// Resolved issues flag.
    pub issues: TriState,
    /// Resolved projects flag.
    pub projects: TriState,
    /// Resolved delete-branch-on-merge flag.
    pub delete_branch_on_merge: TriState,
}

impl EffectiveFeatures {
    /// Returns `true` when no repository feature flag is set.
    ///
    /// Delete-branch-on-merge is excluded: it is applied through a separate
    /// repository-settings call, not the feature mutation.
    pub fn is_unset(&self) -> bool {
        self.wiki.is_unset() && self.issues.is_unset() && self.projects.is_unset()
    }
}
