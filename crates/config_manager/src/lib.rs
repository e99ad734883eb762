//! Declarative configuration model for repository governance.
//!
//! This crate defines the desired-state model that the reconciliation engine
//! applies to live GitHub repositories: organization-wide team grants, a
//! branch protection specification, per-repository feature flags, and the
//! default label set. The same model is produced by the importer when
//! converting live repository state back into configuration, so desired and
//! live state can be diffed structurally.
//!
//! The model is format-agnostic; loading it from a YAML file is the concern
//! of the CLI crate.

use serde::{Deserialize, Serialize};

pub mod errors;
pub use errors::ValidationError;

pub mod tri_state;
pub use tri_state::TriState;

pub mod settings;
pub use settings::{
    BranchProtectionSpec, EffectiveFeatures, LabelConfig, PermissionLevel, RepositoryConfig,
    RepositoryDefaults, TeamPermission,
};

pub mod validator;
pub use validator::{validate_branch_protection, validate_settings, MAX_APPROVER_COUNT};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Complete governance configuration for one organization.
///
/// Carries everything a reconciliation pass needs: the organization name, the
/// branch protection specification applied to every configured repository,
/// the team grants, the repositories with their per-repository overrides, and
/// the default label set.
///
/// # Examples
///
/// ```rust
/// use config_manager::{GovernanceConfig, RepositoryConfig};
///
/// let config = GovernanceConfig {
///     organization: "acme".to_string(),
///     repositories: vec![RepositoryConfig::new("widget-service")],
///     ..Default::default()
/// };
/// assert_eq!(config.organization, "acme");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// The GitHub organization that owns every configured repository.
    #[serde(default)]
    pub organization: String,

    /// Branch protection applied to each repository's protected pattern.
    #[serde(default, rename = "branches")]
    pub branch_protection: BranchProtectionSpec,

    /// Team grants applied to every configured repository.
    #[serde(default, rename = "team", skip_serializing_if = "Vec::is_empty")]
    pub team_permissions: Vec<TeamPermission>,

    /// The repositories under management.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<RepositoryConfig>,

    /// Labels reconciled onto every configured repository.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_labels: Vec<LabelConfig>,

    /// Organization-level feature defaults, overridden per repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<RepositoryDefaults>,
}

impl GovernanceConfig {
    /// Resolves the effective feature flags for one repository.
    ///
    /// Repository-level values take precedence over the organization-level
    /// defaults; a flag that is set at neither level stays unset and is
    /// omitted from any mutation built from the result.
    pub fn effective_features(&self, repository: &RepositoryConfig) -> EffectiveFeatures {
        repository.effective_features(self.defaults.as_ref())
    }
}
