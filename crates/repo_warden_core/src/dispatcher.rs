//! Dual-API branch protection dispatch.
//!
//! One desired branch protection specification spans two APIs with
//! non-overlapping coverage: the GraphQL rule mutation carries review and
//! status-check settings, while admin enforcement, push restrictions and the
//! other advanced toggles only exist on the REST protection endpoint. The
//! dispatcher splits the specification accordingly and applies both halves
//! with defined failure semantics.

use config_manager::{BranchProtectionSpec, ValidationError};
use github_client::{
    GraphClient, ProtectionOverlay, ProtectionRuleInput, RepositoriesClient, RepositoryId,
};
use tracing::{info, warn};

use crate::errors::WardenError;

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;

/// What a dispatch attempt accomplished.
#[derive(Debug, Default)]
pub struct BranchProtectionOutcome {
    /// Whether the GraphQL rule was created.
    pub rule_created: bool,

    /// REST-step failures, collected rather than propagated.
    ///
    /// The REST overlay is best-effort: the rule itself was created even when
    /// entries are present here.
    pub rest_errors: Vec<github_client::Error>,
}

impl BranchProtectionOutcome {
    /// Returns `true` when both steps applied cleanly.
    pub fn is_complete(&self) -> bool {
        self.rule_created && self.rest_errors.is_empty()
    }
}

/// Splits a specification into its GraphQL-native and REST-only halves.
///
/// The classification is fixed: require-PR-reviews, approver count,
/// require-code-owners, require-status-checks, the status-check list and
/// require-up-to-date-branch travel in the GraphQL mutation; enforce-admins,
/// push restrictions, conversation resolution, linear history, force pushes
/// and deletions only exist on the REST endpoint. Unset fields are omitted
/// from both halves, never zeroed.
pub fn classify_features(spec: &BranchProtectionSpec) -> (ProtectionRuleInput, ProtectionOverlay) {
    let rule = ProtectionRuleInput {
        requires_approving_reviews: spec.require_pull_request_reviews.as_bool(),
        required_approving_review_count: spec.require_approving_count,
        requires_code_owner_reviews: spec.require_code_owners.as_bool(),
        requires_status_checks: spec.require_status_checks.as_bool(),
        requires_strict_status_checks: spec.require_up_to_date_branch.as_bool(),
        required_status_check_contexts: if spec.status_checks.is_empty() {
            None
        } else {
            Some(spec.status_checks.clone())
        },
    };

    let overlay = ProtectionOverlay {
        enforce_admins: spec.enforce_admins.as_bool(),
        // An empty restriction set is invalid upstream; validation rejects it
        // before dispatch, and the overlay leaves restrictions untouched
        // unless the allowlist is populated.
        push_allowlist: if spec.restrict_pushes.is_enabled() && !spec.push_allowlist.is_empty() {
            Some(spec.push_allowlist.clone())
        } else {
            None
        },
        required_conversation_resolution: spec.require_conversation_resolution.as_bool(),
        required_linear_history: spec.require_linear_history.as_bool(),
        allow_force_pushes: spec.allow_force_pushes.as_bool(),
        allow_deletions: spec.allow_deletions.as_bool(),
    };

    (rule, overlay)
}

/// Applies branch protection for one pattern across both APIs.
///
/// The GraphQL mutation always runs first, carrying only the
/// GraphQL-expressible subset. A GraphQL failure is fatal: the wrapped error
/// is returned immediately and the REST step is not attempted. A
/// pre-existing rule for the pattern surfaces as a wrapped
/// [`github_client::Error::BranchProtectionRuleExists`]; callers may treat
/// it as "update needed", and the dispatcher does not retry as an update.
///
/// When the mutation succeeds, the REST-only remainder (if any field is set)
/// is applied best-effort; REST failures are collected on the returned
/// outcome instead of failing the dispatch.
///
/// An absent specification is a contract violation and fails with a
/// validation error before any API call.
///
/// # Errors
///
/// Returns a validation error for an absent spec, or the wrapped GraphQL
/// error when rule creation fails.
pub async fn apply_branch_protection<C>(
    client: &C,
    owner: &str,
    repo: &str,
    repo_id: &RepositoryId,
    pattern: &str,
    spec: Option<&BranchProtectionSpec>,
) -> Result<BranchProtectionOutcome, WardenError>
where
    C: GraphClient + RepositoriesClient,
{
    let repository = format!("{owner}/{repo}");
    let Some(spec) = spec else {
        return Err(ValidationError::new(
            "branches",
            "nil",
            "branch protection spec cannot be nil",
        )
        .into());
    };

    let (rule, overlay) = classify_features(spec);

    client
        .create_branch_protection_rule(&repository, repo_id, pattern, &rule)
        .await
        .map_err(|e| WardenError::operation("create branch protection rule", repository.as_str(), e))?;

    let mut outcome = BranchProtectionOutcome {
        rule_created: true,
        rest_errors: Vec::new(),
    };

    if overlay.is_empty() {
        return Ok(outcome);
    }

    if let Err(e) = client
        .update_branch_protection(owner, repo, pattern, &overlay)
        .await
    {
        warn!(
            repository = %repository,
            pattern = pattern,
            error = %e,
            "REST branch protection step failed"
        );
        outcome.rest_errors.push(e);
    } else {
        info!(
            repository = %repository,
            pattern = pattern,
            "applied advanced branch protection via REST"
        );
    }

    Ok(outcome)
}
