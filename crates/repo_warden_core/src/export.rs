//! CSV export of repository configuration.
//!
//! Serialises imported configuration into a fixed-column CSV schema, one row
//! per repository. Unset fields become empty cells, never `false`; the two
//! list-valued fields are `|`-joined. Appending to an existing file is only
//! allowed when its header row matches this schema exactly.

use std::io::Write;

use config_manager::{GovernanceConfig, TriState};
use tracing::{debug, info, warn};

use crate::errors::{BatchError, RepositoryError, WardenError};
use crate::importer::import_repository_config;

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;

/// Number of parts in an `owner/repo` argument.
const OWNER_REPO_PARTS: usize = 2;

/// Column headers of the export schema, in order.
pub fn csv_headers() -> Vec<&'static str> {
    vec![
        "owner",
        "repo",
        "organization",
        "wiki_enabled",
        "issues_enabled",
        "projects_enabled",
        "private",
        "archived",
        "template",
        "default_branch",
        "delete_branch_on_merge",
        "discussions_enabled",
        "require_pull_request_reviews",
        "require_approving_count",
        "require_code_owners",
        "allow_merge_commit",
        "allow_squash_merge",
        "allow_rebase_merge",
        "require_status_checks",
        "require_up_to_date_branch",
        "enforce_admins",
        "restrict_pushes",
        "require_conversation_resolution",
        "require_linear_history",
        "allow_force_pushes",
        "allow_deletions",
        "status_checks",
        "push_allowlist",
    ]
}

/// Converts a single-repository configuration into one CSV row.
///
/// Columns follow [`csv_headers`]. When the configuration carries no
/// repository entry the row holds only owner and repo. Only the first
/// repository entry is used; branch-related values come from the
/// configuration's branch protection block.
pub fn to_csv_row(config: &GovernanceConfig, owner: &str, repo: &str) -> Vec<String> {
    let Some(repo_config) = config.repositories.first() else {
        let mut row = vec![String::new(); csv_headers().len()];
        row[0] = sanitize_cell(owner);
        row[1] = sanitize_cell(repo);
        return row;
    };
    let branch = &config.branch_protection;

    vec![
        sanitize_cell(owner),
        sanitize_cell(repo),
        sanitize_cell(&config.organization),
        tri_state_cell(repo_config.wiki),
        tri_state_cell(repo_config.issues),
        tri_state_cell(repo_config.projects),
        tri_state_cell(repo_config.private),
        tri_state_cell(repo_config.archived),
        tri_state_cell(repo_config.template),
        optional_cell(repo_config.default_branch.as_deref()),
        tri_state_cell(repo_config.delete_branch_on_merge),
        tri_state_cell(repo_config.discussions),
        tri_state_cell(branch.require_pull_request_reviews),
        count_cell(branch.require_approving_count),
        tri_state_cell(branch.require_code_owners),
        tri_state_cell(branch.allow_merge_commit),
        tri_state_cell(branch.allow_squash_merge),
        tri_state_cell(branch.allow_rebase_merge),
        tri_state_cell(branch.require_status_checks),
        tri_state_cell(branch.require_up_to_date_branch),
        tri_state_cell(branch.enforce_admins),
        tri_state_cell(branch.restrict_pushes),
        tri_state_cell(branch.require_conversation_resolution),
        tri_state_cell(branch.require_linear_history),
        tri_state_cell(branch.allow_force_pushes),
        tri_state_cell(branch.allow_deletions),
        list_cell(&branch.status_checks),
        list_cell(&branch.push_allowlist),
    ]
}

fn tri_state_cell(value: TriState) -> String {
    match value.as_bool() {
        None => String::new(),
        Some(v) => v.to_string(),
    }
}

fn optional_cell(value: Option<&str>) -> String {
    value.map(sanitize_cell).unwrap_or_default()
}

fn count_cell(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn list_cell(values: &[String]) -> String {
    if values.is_empty() {
        return String::new();
    }
    sanitize_cell(&values.join("|"))
}

/// Prefixes risky values to prevent CSV formula injection in spreadsheet
/// viewers.
fn sanitize_cell(value: &str) -> String {
    match value.trim_start_matches([' ', '\t']).chars().next() {
        Some('=') | Some('+') | Some('-') | Some('@') => format!("'{value}"),
        _ => value.to_string(),
    }
}

/// Checks an existing header row against the export schema.
///
/// # Errors
///
/// Returns [`WardenError::IncompatibleCsvHeaders`] when the rows differ in
/// length, order or content.
pub fn validate_append_headers(existing: &[String]) -> Result<(), WardenError> {
    let expected: Vec<String> = csv_headers().iter().map(|h| h.to_string()).collect();
    if existing != expected.as_slice() {
        return Err(WardenError::IncompatibleCsvHeaders {
            expected,
            found: existing.to_vec(),
        });
    }
    Ok(())
}

/// Parses `owner/repo` arguments plus an optional batch-file body into a
/// de-duplicated repository list.
///
/// Batch content is parsed line by line; blank lines and `#` comments are
/// skipped. Order of first occurrence is preserved.
///
/// # Errors
///
/// Returns [`WardenError::InvalidRepoFormat`] for any entry that is not
/// `owner/repo`.
pub fn parse_repository_list(
    args: &[String],
    batch_content: Option<&str>,
) -> Result<Vec<String>, WardenError> {
    let mut repos = Vec::new();

    for arg in args {
        let arg = arg.trim();
        validate_repo_format(arg)?;
        repos.push(arg.to_string());
    }

    if let Some(content) = batch_content {
        for (line_number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            validate_repo_format(line).map_err(|_| {
                WardenError::InvalidRepoFormat(format!("line {}: '{line}'", line_number + 1))
            })?;
            repos.push(line.to_string());
        }
    }

    Ok(remove_duplicates(repos))
}

fn validate_repo_format(repo: &str) -> Result<(), WardenError> {
    let parts: Vec<&str> = repo.split('/').collect();
    if parts.len() != OWNER_REPO_PARTS || parts[0].is_empty() || parts[1].is_empty() {
        return Err(WardenError::InvalidRepoFormat(repo.to_string()));
    }
    Ok(())
}

fn remove_duplicates(repos: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    repos.into_iter().filter(|r| seen.insert(r.clone())).collect()
}

/// Imports each repository and writes one CSV row per repository to `output`.
///
/// Team-permission fetch failures are relaxed during export so a transient
/// failure cannot abort the batch. Per-repository failures are collected and
/// reported in one [`BatchError`] carrying totals; rows already written stay
/// written.
///
/// # Errors
///
/// Returns a CSV error when writing fails, or a [`WardenError::Batch`] when
/// any repository failed to process.
pub async fn process_repositories_csv<C, W>(
    client: &C,
    repos: &[String],
    output: W,
    write_header: bool,
) -> Result<(), WardenError>
where
    C: github_client::RepositoriesClient + github_client::LabelsClient,
    W: Write,
{
    let mut writer = csv::Writer::from_writer(output);

    if write_header {
        writer.write_record(csv_headers())?;
    }

    let mut success_count = 0;
    let mut errors: Vec<RepositoryError> = Vec::new();

    info!(total_repositories = repos.len(), "starting CSV export");

    for (i, entry) in repos.iter().enumerate() {
        let parts: Vec<&str> = entry.split('/').collect();
        if parts.len() != OWNER_REPO_PARTS {
            errors.push(RepositoryError::repository(
                entry.as_str(),
                WardenError::InvalidRepoFormat(entry.clone()),
            ));
            continue;
        }
        let (owner, repo) = (parts[0], parts[1]);

        debug!(
            owner = owner,
            repo = repo,
            progress = i + 1,
            total = repos.len(),
            "processing repository"
        );

        match import_repository_config(client, owner, repo, true).await {
            Ok(config) => {
                writer.write_record(to_csv_row(&config, owner, repo))?;
                success_count += 1;
            }
            Err(e) => {
                warn!(owner = owner, repo = repo, error = %e, "failed to process repository");
                errors.push(RepositoryError::repository(format!("{owner}/{repo}"), e));
            }
        }

        if (i + 1) % 10 == 0 {
            info!(
                processed = i + 1,
                total = repos.len(),
                success = success_count,
                errors = errors.len(),
                "CSV export progress"
            );
        }
    }

    writer.flush().map_err(csv::Error::from)?;

    info!(
        total_processed = repos.len(),
        successful = success_count,
        failed = errors.len(),
        "CSV export completed"
    );

    if !errors.is_empty() {
        return Err(BatchError {
            total: repos.len(),
            success_count,
            error_count: errors.len(),
            errors,
        }
        .into());
    }

    Ok(())
}
