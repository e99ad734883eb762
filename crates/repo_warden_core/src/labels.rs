//! Label reconciliation.
//!
//! Computes a three-way diff (create/update/delete) between the desired
//! label set and the labels currently on a repository, then applies it.

use std::collections::HashMap;

use config_manager::LabelConfig;
use github_client::{LabelPayload, LabelsClient, RepositoryId, RepositoryLabel};
use tracing::{debug, info};

use crate::errors::WardenError;

#[cfg(test)]
#[path = "labels_tests.rs"]
mod tests;

/// Reconciles the repository's labels against the desired set.
///
/// Fetches the complete current label set (pagination handled by the
/// client), matches by name, and then:
///
/// - updates every matched label unconditionally (matching is by name only,
///   so an update is issued even when color and description already agree);
/// - creates every desired label with no match;
/// - deletes every remote label left unmatched.
///
/// Processing order across labels is unspecified. The first failing
/// create/update/delete aborts the sync and is returned wrapped with the
/// failing operation; changes already applied are not rolled back.
///
/// # Errors
///
/// Returns a [`WardenError::Operation`] naming the label operation that
/// failed.
pub async fn sync_labels<C>(
    client: &C,
    owner: &str,
    repo: &str,
    repo_id: &RepositoryId,
    desired: &[LabelConfig],
) -> Result<(), WardenError>
where
    C: LabelsClient,
{
    let repository = format!("{owner}/{repo}");
    info!(
        repository = %repository,
        desired = desired.len(),
        "synchronizing labels"
    );

    let current = client
        .list_labels(owner, repo)
        .await
        .map_err(|e| WardenError::operation("list labels", repository.as_str(), e))?;

    let mut remaining: HashMap<String, RepositoryLabel> = current
        .into_iter()
        .map(|label| (label.name.clone(), label))
        .collect();

    for label in desired {
        let payload = LabelPayload {
            name: label.name.clone(),
            color: label.color.clone(),
            description: label.description.clone(),
        };
        match remaining.remove(&label.name) {
            Some(existing) => {
                debug!(name = %label.name, "editing existing label");
                client
                    .update_label(owner, repo, &existing.id, &payload)
                    .await
                    .map_err(|e| {
                        WardenError::operation(format!("update label {}", label.name), repository.as_str(), e)
                    })?;
            }
            None => {
                debug!(name = %label.name, "creating label");
                client
                    .create_label(owner, repo, repo_id, &payload)
                    .await
                    .map_err(|e| {
                        WardenError::operation(format!("create label {}", label.name), repository.as_str(), e)
                    })?;
            }
        }
    }

    for (name, leftover) in remaining {
        debug!(name = %name, "deleting label absent from desired set");
        client
            .delete_label(owner, repo, &leftover.id)
            .await
            .map_err(|e| WardenError::operation(format!("delete label {name}"), repository.as_str(), e))?;
    }

    Ok(())
}
