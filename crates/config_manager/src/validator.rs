//! Validation of the governance configuration.
//!
//! All validation is pure: no network access, no mutation. Callers must not
//! proceed to any API dispatch when validation fails.

use std::collections::HashSet;

use tracing::debug;

use crate::{BranchProtectionSpec, GovernanceConfig, ValidationError};

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

/// Sanity ceiling for the required approver count.
///
/// Values above this are rejected, not clamped.
pub const MAX_APPROVER_COUNT: i32 = 100;

/// Maximum length of a GitHub organization name.
const MAX_ORGANIZATION_NAME_LENGTH: usize = 39;

/// Validates a branch protection specification for internal consistency.
///
/// An absent specification is itself an error: the system must not silently
/// proceed with empty protection. Rules are checked in a fixed priority
/// order and the first violation is returned:
///
/// 1. absent specification
/// 2. negative, then oversized, approver count
/// 3. status-check consistency (required with an empty list, empty check
///    names, checks listed without being required)
/// 4. up-to-date requirement without required status checks
/// 5. push-restriction consistency (empty allowlist, empty entries,
///    duplicate entries)
/// 6. linear history conflicting with force pushes
/// 7. duplicate status-check names
///
/// # Errors
///
/// Returns a [`ValidationError`] naming the first violated rule.
pub fn validate_branch_protection(
    spec: Option<&BranchProtectionSpec>,
) -> Result<(), ValidationError> {
    let Some(spec) = spec else {
        return Err(ValidationError::new(
            "branches",
            "nil",
            "branch protection spec cannot be nil",
        ));
    };

    validate_approver_count(spec)?;
    validate_status_checks(spec)?;
    validate_up_to_date_requirement(spec)?;
    validate_push_allowlist(spec)?;
    validate_conflicts(spec)?;
    validate_duplicate_status_checks(spec)?;

    debug!("branch protection spec validated");
    Ok(())
}

fn validate_approver_count(spec: &BranchProtectionSpec) -> Result<(), ValidationError> {
    let Some(count) = spec.require_approving_count else {
        return Ok(());
    };
    if count < 0 {
        return Err(ValidationError::new(
            "require_approving_count",
            count.to_string(),
            "approver count cannot be negative",
        ));
    }
    if count > MAX_APPROVER_COUNT {
        return Err(ValidationError::new(
            "require_approving_count",
            count.to_string(),
            "approver count seems unreasonably high",
        ));
    }
    Ok(())
}

fn validate_status_checks(spec: &BranchProtectionSpec) -> Result<(), ValidationError> {
    if spec.require_status_checks.is_enabled() {
        if spec.status_checks.is_empty() {
            return Err(ValidationError::new(
                "status_checks",
                "[]",
                "require_status_checks is enabled but no status checks specified",
            ));
        }
        for (i, check) in spec.status_checks.iter().enumerate() {
            if check.trim().is_empty() {
                return Err(ValidationError::new(
                    format!("status_checks[{i}]"),
                    check.clone(),
                    "empty status check name",
                ));
            }
        }
        return Ok(());
    }
    if !spec.status_checks.is_empty() {
        return Err(ValidationError::new(
            "status_checks",
            spec.status_checks.join(", "),
            "status checks specified but require_status_checks is disabled",
        ));
    }
    Ok(())
}

fn validate_up_to_date_requirement(spec: &BranchProtectionSpec) -> Result<(), ValidationError> {
    if !spec.require_up_to_date_branch.is_enabled() {
        return Ok(());
    }
    if !spec.require_status_checks.is_enabled() {
        return Err(ValidationError::new(
            "require_up_to_date_branch",
            "true",
            "require_up_to_date_branch requires require_status_checks to be enabled",
        ));
    }
    Ok(())
}

fn validate_push_allowlist(spec: &BranchProtectionSpec) -> Result<(), ValidationError> {
    if !spec.restrict_pushes.is_enabled() {
        return Ok(());
    }
    if spec.push_allowlist.is_empty() {
        return Err(ValidationError::new(
            "push_allowlist",
            "[]",
            "restrict_pushes is enabled but no users/teams specified in push_allowlist",
        ));
    }
    for (i, actor) in spec.push_allowlist.iter().enumerate() {
        if actor.trim().is_empty() {
            return Err(ValidationError::new(
                format!("push_allowlist[{i}]"),
                actor.clone(),
                "empty entry in push_allowlist",
            ));
        }
    }
    let mut seen = HashSet::new();
    for actor in &spec.push_allowlist {
        let trimmed = actor.trim();
        if !seen.insert(trimmed) {
            return Err(ValidationError::new(
                "push_allowlist",
                trimmed,
                "duplicate entry in push_allowlist",
            ));
        }
    }
    Ok(())
}

fn validate_conflicts(spec: &BranchProtectionSpec) -> Result<(), ValidationError> {
    if spec.require_linear_history.is_enabled() && spec.allow_force_pushes.is_enabled() {
        return Err(ValidationError::new(
            "allow_force_pushes",
            "true",
            "require_linear_history and allow_force_pushes cannot both be enabled",
        ));
    }
    Ok(())
}

fn validate_duplicate_status_checks(spec: &BranchProtectionSpec) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for check in &spec.status_checks {
        if !seen.insert(check.as_str()) {
            return Err(ValidationError::new(
                "status_checks",
                check.clone(),
                "duplicate status check",
            ));
        }
    }
    Ok(())
}

/// Validates the overall governance configuration.
///
/// Checks the organization name, the branch protection block, and the
/// repository list (present, no empty names, no duplicates).
///
/// # Errors
///
/// Returns a [`ValidationError`] naming the first violated rule.
pub fn validate_settings(config: &GovernanceConfig) -> Result<(), ValidationError> {
    let organization = config.organization.trim();
    if organization.is_empty() {
        return Err(ValidationError::new(
            "organization",
            config.organization.clone(),
            "organization must be specified and cannot be empty",
        ));
    }
    if organization.len() > MAX_ORGANIZATION_NAME_LENGTH {
        return Err(ValidationError::new(
            "organization",
            organization,
            "organization name must be between 1 and 39 characters",
        ));
    }

    validate_branch_protection(Some(&config.branch_protection))?;

    if config.repositories.is_empty() {
        return Err(ValidationError::new(
            "repositories",
            "[]",
            "at least one repository must be specified",
        ));
    }

    let mut names = HashSet::new();
    for (i, repo) in config.repositories.iter().enumerate() {
        let name = repo.name.trim();
        if name.is_empty() {
            return Err(ValidationError::new(
                format!("repositories[{i}].name"),
                repo.name.clone(),
                "repository name must be specified and cannot be empty",
            ));
        }
        if !names.insert(name) {
            return Err(ValidationError::new(
                format!("repositories[{i}].name"),
                name,
                "duplicate repository name",
            ));
        }
    }

    Ok(())
}
