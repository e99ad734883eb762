//! Reconciliation engine for declarative GitHub repository governance.
//!
//! The engine compares a desired-state [`config_manager::GovernanceConfig`]
//! against live repository state and applies the difference through the
//! narrow client capabilities defined by the `github_client` crate:
//!
//! - [`mapper`] applies team permissions, repository feature flags and
//!   merge-strategy settings as a best-effort batch;
//! - [`dispatcher`] splits branch protection across the GraphQL and REST
//!   APIs and applies both halves with defined failure semantics;
//! - [`labels`] reconciles repository labels by three-way diff;
//! - [`importer`] converts live repository state back into the declarative
//!   model;
//! - [`export`] serialises imported configuration into the fixed CSV schema.
//!
//! Execution is sequential and synchronous per call; no state is shared
//! across the engine, and the remote GitHub state is assumed to have no
//! other writer during a reconciliation pass.

pub mod errors;
pub use errors::{BatchError, RepositoryError, WardenError};

pub mod dispatcher;
pub use dispatcher::{apply_branch_protection, classify_features, BranchProtectionOutcome};

pub mod labels;
pub use labels::sync_labels;

pub mod mapper;
pub use mapper::{map_permissions, update_merge_strategies, MapReport};

pub mod importer;
pub use importer::{convert_branch_protection, import_repository_config};

pub mod export;
pub use export::{
    csv_headers, parse_repository_list, process_repositories_csv, to_csv_row,
    validate_append_headers,
};
