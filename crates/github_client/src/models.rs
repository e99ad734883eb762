//! Data models for the GitHub client.
//!
//! REST response shapes are deserialized directly from the API JSON; payload
//! types serialize only the fields that carry a value so unset settings are
//! never sent as `false`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// The opaque GraphQL node ID of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryId(pub String);

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RepositoryId {
    fn from(value: &str) -> Self {
        RepositoryId(value.to_string())
    }
}

/// Repository identity and feature flags returned by the lookup query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryFacts {
    /// The GraphQL node ID used by every repository mutation.
    pub id: RepositoryId,
    /// Whether the wiki is enabled.
    pub has_wiki: bool,
    /// Whether issues are enabled.
    pub has_issues: bool,
    /// Whether projects are enabled.
    pub has_projects: bool,
}

/// Repository settings as reported by the REST repository endpoint.
///
/// Every field is optional: the importer maps absent fields to unset
/// configuration values rather than defaulting them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryDetails {
    /// Repository name.
    pub name: String,
    /// Whether the wiki is enabled.
    pub has_wiki: Option<bool>,
    /// Whether issues are enabled.
    pub has_issues: Option<bool>,
    /// Whether projects are enabled.
    pub has_projects: Option<bool>,
    /// Whether discussions are enabled.
    pub has_discussions: Option<bool>,
    /// The default branch name.
    pub default_branch: Option<String>,
    /// Whether the repository is private.
    pub private: Option<bool>,
    /// Whether the repository is archived.
    pub archived: Option<bool>,
    /// Whether the repository is a template repository.
    pub is_template: Option<bool>,
    /// Repository description.
    pub description: Option<String>,
    /// Repository homepage URL.
    pub homepage: Option<String>,
    /// Whether head branches are deleted after merge.
    pub delete_branch_on_merge: Option<bool>,
    /// Whether merge commits are allowed.
    pub allow_merge_commit: Option<bool>,
    /// Whether squash merging is allowed.
    pub allow_squash_merge: Option<bool>,
    /// Whether rebase merging is allowed.
    pub allow_rebase_merge: Option<bool>,
}

/// A team's access to a repository, as listed by the REST teams endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamAccess {
    /// The team's display name.
    pub name: String,
    /// The team's slug.
    pub slug: String,
    /// The raw permission string GitHub reports for the team.
    pub permission: Option<String>,
}

/// Branch protection as reported by the REST protection endpoint.
///
/// Sections that are not configured on the branch are absent, not defaulted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchProtection {
    /// Pull-request review requirements.
    pub required_pull_request_reviews: Option<RequiredPullRequestReviews>,
    /// Required status checks.
    pub required_status_checks: Option<RequiredStatusChecks>,
    /// Whether the rules also bind administrators.
    pub enforce_admins: Option<ProtectionSetting>,
    /// Push restrictions.
    pub restrictions: Option<BranchRestrictions>,
    /// Whether review conversations must be resolved.
    pub required_conversation_resolution: Option<ProtectionSetting>,
    /// Whether a linear history is required.
    pub required_linear_history: Option<ProtectionSetting>,
    /// Whether force pushes are allowed.
    pub allow_force_pushes: Option<ProtectionSetting>,
    /// Whether the branch can be deleted.
    pub allow_deletions: Option<ProtectionSetting>,
}

/// The review section of a protection response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequiredPullRequestReviews {
    /// Minimum number of approving reviews.
    #[serde(default)]
    pub required_approving_review_count: i32,
    /// Whether a code owner review is required.
    #[serde(default)]
    pub require_code_owner_reviews: bool,
}

/// The status-check section of a protection response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequiredStatusChecks {
    /// Whether the branch must be up to date before merging.
    #[serde(default)]
    pub strict: bool,
    /// The required status-check contexts.
    pub contexts: Option<Vec<String>>,
}

/// A single on/off protection toggle.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProtectionSetting {
    /// Whether the toggle is on.
    #[serde(default)]
    pub enabled: bool,
}

/// The push-restriction section of a protection response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchRestrictions {
    /// Teams allowed to push.
    #[serde(default)]
    pub teams: Vec<RestrictionTeam>,
    /// Users allowed to push.
    #[serde(default)]
    pub users: Vec<RestrictionUser>,
}

/// A team entry in a push restriction.
#[derive(Debug, Clone, Deserialize)]
pub struct RestrictionTeam {
    /// The team slug; skipped when absent.
    pub slug: Option<String>,
}

/// A user entry in a push restriction.
#[derive(Debug, Clone, Deserialize)]
pub struct RestrictionUser {
    /// The user login; skipped when absent.
    pub login: Option<String>,
}

/// A label as it exists on a repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryLabel {
    /// The label's GraphQL node ID.
    pub id: String,
    /// The label name.
    pub name: String,
    /// The label color (hex without #).
    pub color: String,
    /// The label description.
    pub description: Option<String>,
}

/// Label attributes sent to the label mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelPayload {
    /// The label name.
    pub name: String,
    /// The label color (hex without #).
    pub color: String,
    /// The label description.
    pub description: String,
}

/// Represents the settings that can be updated for a repository.
/// Use `Default::default()` and modify fields as needed.
#[derive(Serialize, Default, Debug, Clone, PartialEq)]
pub struct RepositorySettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_merge_commit: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_squash_merge: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_rebase_merge: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_branch_on_merge: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
}

impl RepositorySettingsUpdate {
    /// Returns `true` when no setting carries a value.
    pub fn is_empty(&self) -> bool {
        *self == RepositorySettingsUpdate::default()
    }
}

/// Feature flags for the repository update mutation.
///
/// Only fields carrying a value are included in the mutation input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureUpdate {
    /// Wiki flag, when set.
    pub wiki: Option<bool>,
    /// Issues flag, when set.
    pub issues: Option<bool>,
    /// Projects flag, when set.
    pub projects: Option<bool>,
    /// Discussions flag, when set.
    pub discussions: Option<bool>,
}

impl FeatureUpdate {
    /// Returns `true` when no flag carries a value.
    pub fn is_empty(&self) -> bool {
        *self == FeatureUpdate::default()
    }
}

/// The GraphQL-expressible subset of a branch protection specification.
///
/// Fields left as `None` are omitted from the mutation input entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionRuleInput {
    /// Require approving reviews.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_approving_reviews: Option<bool>,

    /// Minimum number of approving reviews.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_approving_review_count: Option<i32>,

    /// Require a code owner review.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_code_owner_reviews: Option<bool>,

    /// Require status checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_status_checks: Option<bool>,

    /// Require the branch to be up to date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_strict_status_checks: Option<bool>,

    /// Names of the required status checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_status_check_contexts: Option<Vec<String>>,
}

/// The REST-only remainder of a branch protection specification.
///
/// These settings are not expressible in the GraphQL rule mutation and are
/// applied best-effort through the REST protection endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectionOverlay {
    /// Apply the rules to administrators.
    pub enforce_admins: Option<bool>,
    /// Teams/users allowed to push; `Some` turns push restriction on.
    pub push_allowlist: Option<Vec<String>>,
    /// Require review conversations to be resolved.
    pub required_conversation_resolution: Option<bool>,
    /// Require a linear history.
    pub required_linear_history: Option<bool>,
    /// Allow force pushes.
    pub allow_force_pushes: Option<bool>,
    /// Allow branch deletion.
    pub allow_deletions: Option<bool>,
}

impl ProtectionOverlay {
    /// Returns `true` when no REST-only setting carries a value.
    pub fn is_empty(&self) -> bool {
        *self == ProtectionOverlay::default()
    }
}
