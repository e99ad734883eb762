//! Branch protection specification.
//!
//! Desired branch protection for one pattern (e.g. "main"). Every field is
//! independently optional; unset fields are omitted from API calls rather
//! than sent as `false`.

use crate::TriState;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "branch_protection_tests.rs"]
mod tests;

/// Desired branch protection settings for one branch pattern.
///
/// Split across two APIs at dispatch time: review and status-check fields are
/// expressible in the GraphQL rule mutation, while admin enforcement, push
/// restrictions, conversation resolution, linear history, force pushes and
/// deletions require the REST endpoint. Merge-strategy flags are
/// repository-level REST settings carried here because they are configured
/// alongside the protection rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchProtectionSpec {
    /// Require pull request reviews before merging.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub require_pull_request_reviews: TriState,

    /// Minimum number of approving reviews.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_approving_count: Option<i32>,

    /// Require a review from a code owner.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub require_code_owners: TriState,

    /// Allow merge commits on the repository.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub allow_merge_commit: TriState,

    /// Allow squash merging on the repository.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub allow_squash_merge: TriState,

    /// Allow rebase merging on the repository.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub allow_rebase_merge: TriState,

    /// Require status checks to pass before merging.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub require_status_checks: TriState,

    /// Names of the required status checks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status_checks: Vec<String>,

    /// Require the branch to be up to date with its base before merging.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub require_up_to_date_branch: TriState,

    /// Apply the protection rules to administrators as well.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub enforce_admins: TriState,

    /// Restrict who can push to the protected branch.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub restrict_pushes: TriState,

    /// Teams and users allowed to push when pushes are restricted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub push_allowlist: Vec<String>,

    /// Require all review conversations to be resolved before merging.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub require_conversation_resolution: TriState,

    /// Require a linear commit history.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub require_linear_history: TriState,

    /// Allow force pushes to the protected branch.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub allow_force_pushes: TriState,

    /// Allow the protected branch to be deleted.
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    pub allow_deletions: TriState,
}

impl BranchProtectionSpec {
    /// Returns `true` when no field carries a value.
    pub fn is_empty(&self) -> bool {
        *self == BranchProtectionSpec::default()
    }

    /// Returns `true` when any merge-strategy flag is set.
    pub fn has_merge_strategy(&self) -> bool {
        self.allow_merge_commit.is_set()
            || self.allow_squash_merge.is_set()
            || self.allow_rebase_merge.is_set()
    }
}
