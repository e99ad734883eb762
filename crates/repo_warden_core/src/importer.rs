//! Import of live repository state into the declarative model.
//!
//! Reads a repository's settings, team permissions, branch protection and
//! labels through both APIs and converts them into the same
//! [`GovernanceConfig`] shape used for desired-state input, so live and
//! desired configuration can be diffed structurally or exported.

use config_manager::{
    BranchProtectionSpec, GovernanceConfig, LabelConfig, PermissionLevel, RepositoryConfig,
    TeamPermission, TriState,
};
use github_client::{BranchProtection, LabelsClient, RepositoriesClient, TeamAccess};
use tracing::{debug, info, warn};

use crate::errors::WardenError;

#[cfg(test)]
#[path = "importer_tests.rs"]
mod tests;

/// Branches probed for protection, in order; the first success wins.
const PROTECTION_BRANCHES: [&str; 2] = ["main", "master"];

/// Imports a repository's live configuration.
///
/// Fetches, in order, each step independently fallible and wrapped with its
/// operation:
///
/// 1. repository details (feature flags, visibility, default branch);
/// 2. team permissions, converting GitHub's raw permission strings into the
///    three-level vocabulary (unknown input conservatively maps to pull);
///    with `relax_team_errors` a failure here is logged and yields an empty
///    team list instead of failing the import;
/// 3. branch protection, probing `main` then `master`; absence of protection
///    on both is not an error and yields an empty specification;
/// 4. the repository's labels.
///
/// Merge-strategy flags are merged into the branch protection block from a
/// second repository read; a failure of that read is logged and tolerated,
/// leaving the merge-strategy fields unset.
///
/// # Errors
///
/// Returns a [`WardenError::Operation`] naming the step that failed.
pub async fn import_repository_config<C>(
    client: &C,
    owner: &str,
    repo: &str,
    relax_team_errors: bool,
) -> Result<GovernanceConfig, WardenError>
where
    C: RepositoriesClient + LabelsClient,
{
    let repository = format!("{owner}/{repo}");
    info!(repository = %repository, "importing repository configuration from GitHub");

    let details = client
        .get_repository_details(owner, repo)
        .await
        .map_err(|e| WardenError::operation("get repository details", repository.as_str(), e))?;

    let team_permissions = match client.list_repository_teams(owner, repo).await {
        Ok(teams) => convert_team_permissions(teams),
        Err(e) if relax_team_errors => {
            warn!(
                repository = %repository,
                error = %e,
                "failed to get team permissions, continuing with empty team permissions"
            );
            Vec::new()
        }
        Err(e) => {
            return Err(WardenError::operation("get team permissions", repository.as_str(), e));
        }
    };

    let branch_protection = import_branch_protection(client, owner, repo).await;

    let labels = client
        .list_labels(owner, repo)
        .await
        .map_err(|e| WardenError::operation("list labels", repository.as_str(), e))?;
    let default_labels = labels
        .into_iter()
        .map(|label| LabelConfig {
            name: label.name,
            color: label.color,
            description: label.description.unwrap_or_default(),
        })
        .collect();

    let repository_config = RepositoryConfig {
        name: repo.to_string(),
        wiki: details.has_wiki.into(),
        issues: details.has_issues.into(),
        projects: details.has_projects.into(),
        default_branch: details.default_branch,
        private: details.private.into(),
        archived: details.archived.into(),
        template: details.is_template.into(),
        description: details.description,
        homepage: details.homepage,
        delete_branch_on_merge: details.delete_branch_on_merge.into(),
        discussions: details.has_discussions.into(),
    };

    Ok(GovernanceConfig {
        organization: owner.to_string(),
        branch_protection,
        team_permissions,
        repositories: vec![repository_config],
        default_labels,
        defaults: None,
    })
}

/// Converts raw team listings into grants with the conservative default.
fn convert_team_permissions(teams: Vec<TeamAccess>) -> Vec<TeamPermission> {
    teams
        .into_iter()
        .map(|team| TeamPermission {
            team: team.slug,
            level: PermissionLevel::from_github(team.permission.as_deref().unwrap_or_default()),
        })
        .collect()
}

/// Reads branch protection, probing `main` then `master`.
///
/// Absence of protection on both branches yields an empty specification.
/// When protection is found, merge-strategy flags are merged in from a
/// second repository read whose failure is tolerated.
async fn import_branch_protection<C>(client: &C, owner: &str, repo: &str) -> BranchProtectionSpec
where
    C: RepositoriesClient,
{
    let mut protection = None;
    for branch in PROTECTION_BRANCHES {
        match client.get_branch_protection(owner, repo, branch).await {
            Ok(found) => {
                debug!(branch = branch, "found branch protection rules");
                protection = Some(found);
                break;
            }
            Err(e) => {
                debug!(branch = branch, error = %e, "no branch protection on branch");
            }
        }
    }

    let Some(protection) = protection else {
        debug!("no branch protection rules found, using defaults");
        return convert_branch_protection(None);
    };

    let mut spec = convert_branch_protection(Some(&protection));

    match client.get_repository_details(owner, repo).await {
        Ok(details) => {
            spec.allow_merge_commit = details.allow_merge_commit.into();
            spec.allow_squash_merge = details.allow_squash_merge.into();
            spec.allow_rebase_merge = details.allow_rebase_merge.into();
        }
        Err(e) => {
            warn!(error = %e, "failed to get repository merge settings");
        }
    }

    spec
}

/// Converts a REST protection object into the declarative specification.
///
/// Each section is mapped independently and only written when the upstream
/// section is present; absence leaves the field unset, never `false`. An
/// absent protection object converts to a specification with every field
/// unset.
pub fn convert_branch_protection(protection: Option<&BranchProtection>) -> BranchProtectionSpec {
    let Some(protection) = protection else {
        return BranchProtectionSpec::default();
    };

    let mut spec = BranchProtectionSpec::default();

    if let Some(reviews) = &protection.required_pull_request_reviews {
        spec.require_pull_request_reviews = TriState::Enabled;
        spec.require_approving_count = Some(reviews.required_approving_review_count);
        spec.require_code_owners = TriState::from(reviews.require_code_owner_reviews);
    }

    if let Some(checks) = &protection.required_status_checks {
        spec.require_status_checks = TriState::Enabled;
        spec.require_up_to_date_branch = TriState::from(checks.strict);
        if let Some(contexts) = &checks.contexts {
            if !contexts.is_empty() {
                spec.status_checks = contexts.clone();
            }
        }
    }

    if let Some(admins) = &protection.enforce_admins {
        spec.enforce_admins = TriState::from(admins.enabled);
    }

    if let Some(restrictions) = &protection.restrictions {
        spec.restrict_pushes = TriState::Enabled;
        let mut allowlist = Vec::new();
        for team in &restrictions.teams {
            if let Some(slug) = &team.slug {
                allowlist.push(slug.clone());
            }
        }
        for user in &restrictions.users {
            if let Some(login) = &user.login {
                allowlist.push(login.clone());
            }
        }
        spec.push_allowlist = allowlist;
    }

    if let Some(setting) = &protection.required_conversation_resolution {
        spec.require_conversation_resolution = TriState::from(setting.enabled);
    }
    if let Some(setting) = &protection.required_linear_history {
        spec.require_linear_history = TriState::from(setting.enabled);
    }
    if let Some(setting) = &protection.allow_force_pushes {
        spec.allow_force_pushes = TriState::from(setting.enabled);
    }
    if let Some(setting) = &protection.allow_deletions {
        spec.allow_deletions = TriState::from(setting.enabled);
    }

    spec
}
