//! Command implementations.
//!
//! Thin wiring only: load configuration, build the client from the
//! environment, call into the engine, and report the outcome.

use std::fs::OpenOptions;
use std::path::Path;

use config_manager::validate_branch_protection;
use github_client::{ErrorKind, GitHubClient, GraphClient};
use repo_warden_core::{
    apply_branch_protection, import_repository_config, map_permissions, parse_repository_list,
    process_repositories_csv, sync_labels, update_merge_strategies, validate_append_headers,
    MapReport, WardenError,
};
use tracing::{error, info, warn};

use crate::config::load_config;
use crate::errors::Error;

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

/// The branch pattern protection rules are created for.
const DEFAULT_PROTECTED_BRANCH: &str = "main";

/// Applies team permissions and repository feature settings.
pub async fn sync(config_path: &Path) -> Result<(), Error> {
    let config = load_config(config_path)?;
    let client = GitHubClient::from_env()?;

    info!(organization = %config.organization, "mapping all permissions");
    let report = map_permissions(&client, &config).await?;
    report_batch("sync", &report);
    Ok(())
}

/// Applies merge strategies and branch protection for every repository.
pub async fn branches(config_path: &Path) -> Result<(), Error> {
    let config = load_config(config_path)?;
    validate_branch_protection(Some(&config.branch_protection))?;
    let client = GitHubClient::from_env()?;

    info!(organization = %config.organization, "performing branch updates");
    let report = update_merge_strategies(&client, &config).await?;
    report_batch("merge strategies", &report);

    for repo in &config.repositories {
        let repository = format!("{}/{}", config.organization, repo.name);
        let facts = match client
            .resolve_repository(&config.organization, &repo.name)
            .await
        {
            Ok(facts) => facts,
            Err(e) => {
                error!(repository = %repository, error = %e, "getting repository");
                continue;
            }
        };

        let result = apply_branch_protection(
            &client,
            &config.organization,
            &repo.name,
            &facts.id,
            DEFAULT_PROTECTED_BRANCH,
            Some(&config.branch_protection),
        )
        .await;

        match result {
            Ok(outcome) => {
                for rest_error in &outcome.rest_errors {
                    warn!(
                        repository = %repository,
                        error = %rest_error,
                        "advanced branch protection step failed"
                    );
                }
            }
            Err(e) if e.github_kind() == Some(ErrorKind::RuleAlreadyExists) => {
                info!(
                    repository = %repository,
                    pattern = DEFAULT_PROTECTED_BRANCH,
                    "branch protection rule already exists, update needed"
                );
            }
            Err(e) => {
                error!(repository = %repository, error = %e, "setting branch protection");
            }
        }
    }

    Ok(())
}

/// Reconciles labels on every configured repository.
pub async fn label(config_path: &Path) -> Result<(), Error> {
    let config = load_config(config_path)?;
    let client = GitHubClient::from_env()?;

    for repo in &config.repositories {
        let repository = format!("{}/{}", config.organization, repo.name);
        info!(repository = %repository, "updating labels");

        let facts = match client
            .resolve_repository(&config.organization, &repo.name)
            .await
        {
            Ok(facts) => facts,
            Err(e) => {
                error!(repository = %repository, error = %e, "getting repository");
                continue;
            }
        };

        if let Err(e) = sync_labels(
            &client,
            &config.organization,
            &repo.name,
            &facts.id,
            &config.default_labels,
        )
        .await
        {
            error!(repository = %repository, error = %e, "synchronizing labels");
        }
    }

    Ok(())
}

/// Imports one repository's live configuration and prints it as YAML.
pub async fn import(repository: &str) -> Result<(), Error> {
    let (owner, repo) = split_repository(repository)?;
    let client = GitHubClient::from_env()?;

    let config = import_repository_config(&client, &owner, &repo, false).await?;
    let rendered = serde_yaml::to_string(&config)?;
    println!("{rendered}");
    Ok(())
}

/// Exports live configuration for a set of repositories as CSV.
pub async fn export(
    repositories: &[String],
    batch_file: Option<&Path>,
    output: &Path,
    append: bool,
) -> Result<(), Error> {
    let batch_content = match batch_file {
        Some(path) => Some(std::fs::read_to_string(path).map_err(|source| Error::File {
            path: path.display().to_string(),
            source,
        })?),
        None => None,
    };
    let repos = parse_repository_list(repositories, batch_content.as_deref())?;
    let client = GitHubClient::from_env()?;

    let write_header = if append {
        !existing_file_has_schema_header(output)?
    } else {
        true
    };

    let file = OpenOptions::new()
        .create(true)
        .append(append)
        .truncate(!append)
        .write(true)
        .open(output)
        .map_err(|source| Error::File {
            path: output.display().to_string(),
            source,
        })?;

    process_repositories_csv(&client, &repos, file, write_header).await?;
    info!(output = %output.display(), repositories = repos.len(), "CSV export written");
    Ok(())
}

/// Checks whether `path` already carries the export schema's header row.
///
/// A missing or empty file has no header; a file with a different header is
/// rejected so schemas cannot be mixed in one file.
fn existing_file_has_schema_header(path: &Path) -> Result<bool, Error> {
    if !path.exists() {
        return Ok(false);
    }

    let mut reader = csv::Reader::from_path(path).map_err(|source| Error::CsvHeaders {
        path: path.display().to_string(),
        source,
    })?;
    let headers = reader.headers().map_err(|source| Error::CsvHeaders {
        path: path.display().to_string(),
        source,
    })?;
    if headers.is_empty() {
        return Ok(false);
    }

    let found: Vec<String> = headers.iter().map(str::to_string).collect();
    validate_append_headers(&found)?;
    Ok(true)
}

fn split_repository(entry: &str) -> Result<(String, String), Error> {
    let parts: Vec<&str> = entry.split('/').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(WardenError::InvalidRepoFormat(entry.to_string()).into());
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

fn report_batch(operation: &str, report: &MapReport) {
    info!(
        operation = operation,
        applied = report.applied.len(),
        failed = report.errors.len(),
        "batch complete"
    );
    for failure in &report.errors {
        match &failure.team {
            Some(team) => error!(
                repository = %failure.repository,
                team = %team,
                error = %failure.error,
                "batch failure"
            ),
            None => error!(
                repository = %failure.repository,
                error = %failure.error,
                "batch failure"
            ),
        }
    }
}
