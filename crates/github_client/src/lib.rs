//! Crate for interacting with the GitHub REST and GraphQL APIs.
//!
//! This crate provides a client for the fixed set of operations the
//! reconciliation engine needs: team grants, repository settings edits and
//! branch protection reads on the REST side; repository lookup, feature
//! mutations, branch protection rule creation and label operations on the
//! GraphQL side.
//!
//! Each capability is exposed through its own narrow trait
//! ([`TeamsClient`], [`RepositoriesClient`], [`GraphClient`],
//! [`LabelsClient`]) so the engine can be exercised against fakes without a
//! live network dependency. [`GitHubClient`] implements all of them on top of
//! a single authenticated octocrab instance.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde_json::json;
use tracing::{debug, info, instrument};

pub mod auth;
pub use auth::{token_from_env, validate_token, RetryConfig};

pub mod errors;
pub use errors::{Error, ErrorKind};

pub mod models;
pub use models::{
    BranchProtection, BranchRestrictions, FeatureUpdate, LabelPayload, ProtectionOverlay,
    ProtectionRuleInput, ProtectionSetting, RepositoryDetails, RepositoryFacts, RepositoryId,
    RepositoryLabel, RepositorySettingsUpdate, RequiredPullRequestReviews, RequiredStatusChecks,
    RestrictionTeam, RestrictionUser, TeamAccess,
};

mod graphql;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Trait for team-to-repository permission grants.
#[async_trait]
pub trait TeamsClient: Send + Sync {
    /// Grants `permission` (`admin`, `push` or `pull`) to a team on a
    /// repository.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] classified from the response status when the
    /// grant is rejected.
    async fn grant_team_permission(
        &self,
        org: &str,
        team_slug: &str,
        repo: &str,
        permission: &str,
    ) -> Result<(), Error>;
}

/// Trait for REST repository reads and edits.
#[async_trait]
pub trait RepositoriesClient: Send + Sync {
    /// Fetches the repository's settings (feature flags, visibility, merge
    /// strategies).
    async fn get_repository_details(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryDetails, Error>;

    /// Lists the teams with access to the repository, with their raw
    /// permission strings.
    async fn list_repository_teams(&self, owner: &str, repo: &str)
        -> Result<Vec<TeamAccess>, Error>;

    /// Reads the branch protection configured for one branch.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind [`ErrorKind::NotFound`] when the branch
    /// carries no protection.
    async fn get_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<BranchProtection, Error>;

    /// Updates repository settings through the repository edit endpoint.
    ///
    /// Only the fields provided in the `settings` argument will be updated.
    async fn update_repository_settings(
        &self,
        owner: &str,
        repo: &str,
        settings: &RepositorySettingsUpdate,
    ) -> Result<(), Error>;

    /// Applies the REST-only branch protection settings to one branch.
    async fn update_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        overlay: &ProtectionOverlay,
    ) -> Result<(), Error>;
}

/// Trait for GraphQL query and mutation operations.
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// Resolves a repository's opaque GraphQL ID and feature flags by owner
    /// and name.
    async fn resolve_repository(&self, owner: &str, name: &str) -> Result<RepositoryFacts, Error>;

    /// Updates repository feature flags; unset flags are omitted from the
    /// mutation.
    async fn update_repository_features(
        &self,
        repository: &str,
        id: &RepositoryId,
        features: &FeatureUpdate,
    ) -> Result<(), Error>;

    /// Creates a branch protection rule carrying the GraphQL-expressible
    /// settings.
    async fn create_branch_protection_rule(
        &self,
        repository: &str,
        id: &RepositoryId,
        pattern: &str,
        rule: &ProtectionRuleInput,
    ) -> Result<(), Error>;
}

/// Trait for label operations.
#[async_trait]
pub trait LabelsClient: Send + Sync {
    /// Lists every label on the repository as one materialized list.
    async fn list_labels(&self, owner: &str, repo: &str) -> Result<Vec<RepositoryLabel>, Error>;

    /// Creates a label on the repository identified by `id`.
    async fn create_label(
        &self,
        owner: &str,
        repo: &str,
        id: &RepositoryId,
        label: &LabelPayload,
    ) -> Result<(), Error>;

    /// Rewrites the label identified by `label_id` with the payload's
    /// attributes.
    async fn update_label(
        &self,
        owner: &str,
        repo: &str,
        label_id: &str,
        label: &LabelPayload,
    ) -> Result<(), Error>;

    /// Deletes the label identified by `label_id`.
    async fn delete_label(&self, owner: &str, repo: &str, label_id: &str) -> Result<(), Error>;
}

/// A client for the GitHub REST and GraphQL APIs, authenticated with a
/// personal access token.
#[derive(Debug)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    /// Wraps an already-built octocrab instance.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds a client from a token, validating its format first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToken`] / [`Error::TokenNotFound`] for an
    /// unusable token, or a network error when the client cannot be built.
    pub fn from_token(token: &str) -> Result<Self, Error> {
        validate_token(token)?;
        let octocrab = Octocrab::builder()
            .personal_token(token.trim().to_string())
            .build()
            .map_err(|e| Error::Network {
                operation: "build github client".to_string(),
                message: e.to_string(),
                source: Some(e),
            })?;
        Ok(Self::new(octocrab))
    }

    /// Builds a client from the environment: validated `GITHUB_TOKEN` plus
    /// the `REPO_WARDEN_*` transport budget.
    ///
    /// The transport applies its timeout and retry policy transparently;
    /// callers see each call as either eventually succeeding or failing
    /// terminally once the budget is exhausted.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing/malformed token or
    /// unparseable transport configuration, or a network error when the
    /// client cannot be built.
    pub fn from_env() -> Result<Self, Error> {
        let token = token_from_env()?;
        let retry = RetryConfig::from_env()?;

        info!(
            timeout_seconds = retry.timeout_seconds,
            max_retries = retry.max_retries,
            wait_interval_seconds = retry.wait_interval_seconds,
            multiplier = retry.multiplier,
            total_budget_seconds = retry.total_budget().as_secs(),
            "building GitHub client"
        );

        let octocrab = Octocrab::builder()
            .personal_token(token)
            .set_connect_timeout(Some(retry.timeout()))
            .set_read_timeout(Some(retry.timeout()))
            .add_retry_config(octocrab::service::middleware::retry::RetryConfig::Simple(
                retry.max_retries as usize,
            ))
            .build()
            .map_err(|e| Error::Network {
                operation: "build github client".to_string(),
                message: e.to_string(),
                source: Some(e),
            })?;

        Ok(Self::new(octocrab))
    }

    /// The underlying octocrab instance.
    pub(crate) fn octocrab(&self) -> &Octocrab {
        &self.client
    }
}

#[async_trait]
impl TeamsClient for GitHubClient {
    /// Adds a given team level repository permission.
    #[instrument(skip(self), fields(org = %org, team = %team_slug, repo = %repo))]
    async fn grant_team_permission(
        &self,
        org: &str,
        team_slug: &str,
        repo: &str,
        permission: &str,
    ) -> Result<(), Error> {
        let repository = format!("{org}/{repo}");
        let path = format!("/orgs/{org}/teams/{team_slug}/repos/{org}/{repo}");
        let body = json!({ "permission": permission });

        let response = self
            .client
            ._put(path.as_str(), Some(&body))
            .await
            .map_err(|e| Error::from_octocrab("add team permission", &repository, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::from_status(status, "add team permission", &repository));
        }

        info!(
            status_code = status.as_u16(),
            team = team_slug,
            repository = repository,
            "granted team permission"
        );
        Ok(())
    }
}

#[async_trait]
impl RepositoriesClient for GitHubClient {
    /// Fetches details for a specific repository.
    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn get_repository_details(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryDetails, Error> {
        let repository = format!("{owner}/{repo}");
        let path = format!("/repos/{owner}/{repo}");
        let details: RepositoryDetails = self
            .client
            .get(path, None::<&()>)
            .await
            .map_err(|e| Error::from_octocrab("get repository", &repository, e))?;
        debug!(repository = repository, "repository details retrieved");
        Ok(details)
    }

    /// Lists the teams that have access to the repository.
    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn list_repository_teams(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<TeamAccess>, Error> {
        let repository = format!("{owner}/{repo}");
        let path = format!("/repos/{owner}/{repo}/teams?per_page=100");
        let teams: Vec<TeamAccess> = self
            .client
            .get(path, None::<&()>)
            .await
            .map_err(|e| Error::from_octocrab("list teams", &repository, e))?;
        debug!(repository = repository, count = teams.len(), "teams retrieved");
        Ok(teams)
    }

    /// Reads the branch protection configured for one branch.
    #[instrument(skip(self), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn get_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<BranchProtection, Error> {
        let repository = format!("{owner}/{repo}");
        let path = format!("/repos/{owner}/{repo}/branches/{branch}/protection");
        let protection: BranchProtection = self
            .client
            .get(path, None::<&()>)
            .await
            .map_err(|e| Error::from_octocrab("get branch protection", &repository, e))?;
        debug!(repository = repository, branch = branch, "branch protection retrieved");
        Ok(protection)
    }

    /// Updates settings for a specific repository using the REST API
    /// directly.
    ///
    /// Only the fields provided in the `settings` argument will be updated.
    #[instrument(skip(self, settings), fields(owner = %owner, repo = %repo))]
    async fn update_repository_settings(
        &self,
        owner: &str,
        repo: &str,
        settings: &RepositorySettingsUpdate,
    ) -> Result<(), Error> {
        if settings.is_empty() {
            return Ok(());
        }
        let repository = format!("{owner}/{repo}");
        let path = format!("/repos/{owner}/{repo}");
        let _response: serde_json::Value = self
            .client
            .patch(path, Some(settings))
            .await
            .map_err(|e| Error::from_octocrab("update repository settings", &repository, e))?;
        info!(repository = repository, "updated repository settings");
        Ok(())
    }

    /// Applies advanced branch protection features via the REST API that are
    /// not available in the GraphQL rule mutation.
    #[instrument(skip(self, overlay), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn update_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        overlay: &ProtectionOverlay,
    ) -> Result<(), Error> {
        let repository = format!("{owner}/{repo}");
        let path = format!("/repos/{owner}/{repo}/branches/{branch}/protection");

        // The endpoint requires these four keys on every call; the ones this
        // overlay does not manage are sent as null.
        let mut body = serde_json::Map::new();
        body.insert("required_status_checks".to_string(), serde_json::Value::Null);
        body.insert("required_pull_request_reviews".to_string(), serde_json::Value::Null);
        body.insert("enforce_admins".to_string(), json!(overlay.enforce_admins));
        body.insert(
            "restrictions".to_string(),
            match &overlay.push_allowlist {
                Some(allowlist) => json!({ "teams": allowlist, "users": [] }),
                None => serde_json::Value::Null,
            },
        );
        if let Some(value) = overlay.required_conversation_resolution {
            body.insert("required_conversation_resolution".to_string(), json!(value));
        }
        if let Some(value) = overlay.required_linear_history {
            body.insert("required_linear_history".to_string(), json!(value));
        }
        if let Some(value) = overlay.allow_force_pushes {
            body.insert("allow_force_pushes".to_string(), json!(value));
        }
        if let Some(value) = overlay.allow_deletions {
            body.insert("allow_deletions".to_string(), json!(value));
        }

        let body = serde_json::Value::Object(body);
        debug!(
            repository = repository,
            branch = branch,
            "setting branch protection via REST API"
        );

        let response = self
            .client
            ._put(path.as_str(), Some(&body))
            .await
            .map_err(|e| Error::from_octocrab("update branch protection", &repository, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::from_status(
                status,
                "update branch protection",
                &repository,
            ));
        }

        info!(
            repository = repository,
            branch = branch,
            status_code = status.as_u16(),
            "set branch protection via REST API"
        );
        Ok(())
    }
}
