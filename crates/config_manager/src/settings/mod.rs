//! Configuration setting types for the governance model.
//!
//! This module contains the setting category types used by
//! `GovernanceConfig`: branch protection, repository features, team grants,
//! and labels.

pub mod branch_protection;
pub mod label;
pub mod permission;
pub mod repository;

// Re-export all types for convenient access
pub use branch_protection::BranchProtectionSpec;
pub use label::LabelConfig;
pub use permission::{PermissionLevel, TeamPermission};
pub use repository::{EffectiveFeatures, RepositoryConfig, RepositoryDefaults};
