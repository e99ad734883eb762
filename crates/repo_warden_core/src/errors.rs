//! Error types for the reconciliation engine.
//!
//! Validation failures surface before any mutation; API failures keep their
//! operation and repository context and remain unwrappable to the underlying
//! client error for classification. Batch operations collect per-repository
//! failures instead of aborting the run.

use github_client::ErrorKind;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors produced by the reconciliation engine.
#[derive(Debug, Error)]
pub enum WardenError {
    /// The configuration failed validation; nothing was applied.
    #[error(transparent)]
    Validation(#[from] config_manager::ValidationError),

    /// A single API operation failed.
    #[error("{operation} failed for {repository}")]
    Operation {
        /// The operation that failed, e.g. `create label bug`.
        operation: String,
        /// The `owner/repo` the operation targeted.
        repository: String,
        /// The underlying client error.
        #[source]
        source: github_client::Error,
    },

    /// A repository argument was not in `owner/repo` form.
    #[error("invalid repository format, must be 'owner/repo': '{0}'")]
    InvalidRepoFormat(String),

    /// An existing CSV file's header row does not match the export schema.
    #[error("existing CSV has incompatible headers.\nexpected: {expected:?}\ngot:      {found:?}")]
    IncompatibleCsvHeaders {
        /// The schema this build writes.
        expected: Vec<String>,
        /// The header row found in the file.
        found: Vec<String>,
    },

    /// Writing CSV output failed.
    #[error("failed to write CSV output")]
    Csv(#[from] csv::Error),

    /// A batch run finished with per-repository failures.
    #[error(transparent)]
    Batch(#[from] BatchError),
}

impl WardenError {
    /// Wraps a client error with operation and repository context.
    pub fn operation(
        operation: impl Into<String>,
        repository: impl Into<String>,
        source: github_client::Error,
    ) -> Self {
        WardenError::Operation {
            operation: operation.into(),
            repository: repository.into(),
            source,
        }
    }

    /// The classification of the wrapped client error, if there is one.
    ///
    /// Lets callers treat e.g. [`ErrorKind::RuleAlreadyExists`] as "update
    /// needed" without digging through the error chain themselves.
    pub fn github_kind(&self) -> Option<ErrorKind> {
        match self {
            WardenError::Operation { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

/// A failure tied to one repository (and optionally one team) in a batch.
#[derive(Debug)]
pub struct RepositoryError {
    /// The repository the failure belongs to.
    pub repository: String,
    /// The team involved, for team-grant failures.
    pub team: Option<String>,
    /// What went wrong.
    pub error: WardenError,
}

impl RepositoryError {
    /// A failure scoped to the repository as a whole.
    pub fn repository(repository: impl Into<String>, error: WardenError) -> Self {
        Self {
            repository: repository.into(),
            team: None,
            error,
        }
    }

    /// A failure scoped to one team grant on the repository.
    pub fn team(
        repository: impl Into<String>,
        team: impl Into<String>,
        error: WardenError,
    ) -> Self {
        Self {
            repository: repository.into(),
            team: Some(team.into()),
            error,
        }
    }
}

/// Summary of a batch run that had failures.
///
/// Batches are best-effort: successfully processed repositories stay
/// processed, and there is no rollback.
#[derive(Debug, Error)]
#[error("batch processing completed: {error_count} of {total} failed ({success_count} successful, {error_count} failed)")]
pub struct BatchError {
    /// Number of repositories the batch attempted.
    pub total: usize,
    /// Number processed without error.
    pub success_count: usize,
    /// Number that failed.
    pub error_count: usize,
    /// The individual failures.
    pub errors: Vec<RepositoryError>,
}

impl BatchError {
    /// One line per failed repository, for error reporting.
    pub fn detailed_errors(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|e| match &e.team {
                Some(team) => format!("{} (team {}): {}", e.repository, team, e.error),
                None => format!("{}: {}", e.repository, e.error),
            })
            .collect()
    }
}
