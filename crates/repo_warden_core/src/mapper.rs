//! Batch application of team permissions and repository features.
//!
//! Repositories are processed sequentially; failures are collected per
//! repository (and per team) rather than aborting the run. The batch is
//! best-effort with no rollback: GitHub offers no multi-object transaction
//! to lean on.

use config_manager::{
    validate_branch_protection, validate_settings, GovernanceConfig, RepositoryConfig,
};
use github_client::{
    FeatureUpdate, GraphClient, RepositoriesClient, RepositorySettingsUpdate, TeamsClient,
};
use tracing::{debug, error, info};

use crate::errors::{RepositoryError, WardenError};

#[cfg(test)]
#[path = "mapper_tests.rs"]
mod tests;

/// Outcome of one batch application pass.
#[derive(Debug, Default)]
pub struct MapReport {
    /// Repositories that were applied without any error.
    pub applied: Vec<RepositoryConfig>,

    /// Per-repository and per-team failures.
    pub errors: Vec<RepositoryError>,
}

impl MapReport {
    /// Returns `true` when every repository applied cleanly.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Applies team permissions and repository feature settings for every
/// configured repository.
///
/// The configuration is validated first; validation failure aborts with zero
/// side effects. Per repository the pass then:
///
/// 1. grants each configured team its permission level, one call per team
///    per repository, sequential, not batched;
/// 2. resolves the repository's opaque GraphQL ID (a resolution failure
///    skips the remaining steps for that repository);
/// 3. applies the effective feature flags (repository value over
///    organization default, both-absent omitted) in one mutation;
/// 4. applies delete-branch-on-merge and the default branch through the
///    repository settings endpoint when configured.
///
/// Individual failures are collected on the report and the batch continues.
///
/// # Errors
///
/// Returns a validation error before any API call when the configuration is
/// inconsistent; API failures are reported per repository instead.
pub async fn map_permissions<C>(
    client: &C,
    config: &GovernanceConfig,
) -> Result<MapReport, WardenError>
where
    C: GraphClient + TeamsClient + RepositoriesClient,
{
    validate_settings(config)?;

    let org = &config.organization;
    let mut report = MapReport::default();

    for repo in &config.repositories {
        let repository = format!("{org}/{}", repo.name);
        let errors_before = report.errors.len();

        apply_team_permissions(client, config, repo, &mut report).await;

        let facts = match client.resolve_repository(org, &repo.name).await {
            Ok(facts) => facts,
            Err(e) => {
                error!(repository = %repository, error = %e, "getting repository");
                report.errors.push(RepositoryError::repository(
                    repository.as_str(),
                    WardenError::operation("get repository", repository.as_str(), e),
                ));
                continue;
            }
        };
        debug!(repository = %repository, repo_id = %facts.id, "repository ID resolved");

        let effective = config.effective_features(repo);
        let features = FeatureUpdate {
            wiki: effective.wiki.as_bool(),
            issues: effective.issues.as_bool(),
            projects: effective.projects.as_bool(),
            discussions: repo.discussions.as_bool(),
        };
        if !features.is_empty() {
            if let Err(e) = client
                .update_repository_features(&repository, &facts.id, &features)
                .await
            {
                error!(repository = %repository, error = %e, "setting repository features");
                report.errors.push(RepositoryError::repository(
                    repository.as_str(),
                    WardenError::operation("update repository", repository.as_str(), e),
                ));
            }
        }

        let settings = RepositorySettingsUpdate {
            delete_branch_on_merge: effective.delete_branch_on_merge.as_bool(),
            default_branch: repo.default_branch.clone(),
            ..Default::default()
        };
        if !settings.is_empty() {
            if let Err(e) = client
                .update_repository_settings(org, &repo.name, &settings)
                .await
            {
                error!(repository = %repository, error = %e, "setting advanced repository settings");
                report.errors.push(RepositoryError::repository(
                    repository.as_str(),
                    WardenError::operation("set advanced repository settings", repository.as_str(), e),
                ));
            }
        }

        if report.errors.len() == errors_before {
            report.applied.push(repo.clone());
        }
    }

    info!(
        applied = report.applied.len(),
        failed = report.errors.len(),
        "permission mapping complete"
    );
    Ok(report)
}

async fn apply_team_permissions<C>(
    client: &C,
    config: &GovernanceConfig,
    repo: &RepositoryConfig,
    report: &mut MapReport,
) where
    C: TeamsClient,
{
    if config.team_permissions.is_empty() {
        return;
    }
    let org = &config.organization;
    let repository = format!("{org}/{}", repo.name);

    for grant in &config.team_permissions {
        debug!(
            repository = %repository,
            team = %grant.team,
            level = %grant.level,
            "adding permissions to repository"
        );
        if let Err(e) = client
            .grant_team_permission(org, &grant.team, &repo.name, grant.level.as_str())
            .await
        {
            error!(
                repository = %repository,
                team = %grant.team,
                level = %grant.level,
                error = %e,
                "setting team permissions"
            );
            report.errors.push(RepositoryError::team(
                repository.as_str(),
                grant.team.as_str(),
                WardenError::operation("add team permission", repository.as_str(), e),
            ));
        }
    }
}

/// Updates merge-strategy settings for every configured repository.
///
/// Validates the branch protection block first (the merge flags live there),
/// then edits each repository through the REST settings endpoint. Failures
/// are collected per repository.
///
/// # Errors
///
/// Returns a validation error before any API call when the branch protection
/// block is inconsistent.
pub async fn update_merge_strategies<C>(
    client: &C,
    config: &GovernanceConfig,
) -> Result<MapReport, WardenError>
where
    C: RepositoriesClient,
{
    validate_branch_protection(Some(&config.branch_protection))?;

    let org = &config.organization;
    let spec = &config.branch_protection;
    let settings = RepositorySettingsUpdate {
        allow_merge_commit: spec.allow_merge_commit.as_bool(),
        allow_squash_merge: spec.allow_squash_merge.as_bool(),
        allow_rebase_merge: spec.allow_rebase_merge.as_bool(),
        ..Default::default()
    };

    let mut report = MapReport::default();
    for repo in &config.repositories {
        let repository = format!("{org}/{}", repo.name);
        info!(
            repository = %repository,
            squash_commits = spec.allow_squash_merge.is_enabled(),
            merges = spec.allow_merge_commit.is_enabled(),
            rebase_merge = spec.allow_rebase_merge.is_enabled(),
            "updating merge strategies"
        );
        match client
            .update_repository_settings(org, &repo.name, &settings)
            .await
        {
            Ok(()) => report.applied.push(repo.clone()),
            Err(e) => {
                error!(repository = %repository, error = %e, "updating repository settings");
                report.errors.push(RepositoryError::repository(
                    repository.as_str(),
                    WardenError::operation("update repository settings", repository.as_str(), e),
                ));
            }
        }
    }

    Ok(report)
}
