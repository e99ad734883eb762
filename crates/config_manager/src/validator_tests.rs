//! Unit tests for configuration validation.

use super::*;
use crate::settings::RepositoryConfig;
use crate::TriState;

fn spec_with_checks(checks: &[&str]) -> BranchProtectionSpec {
    BranchProtectionSpec {
        require_status_checks: TriState::Enabled,
        status_checks: checks.iter().map(|c| c.to_string()).collect(),
        ..Default::default()
    }
}

#[test]
fn nil_spec_fails_with_cannot_be_nil() {
    let err = validate_branch_protection(None).unwrap_err();
    assert_eq!(err.field, "branches");
    assert!(err.message.contains("cannot be nil"));
}

#[test]
fn empty_spec_is_valid() {
    let spec = BranchProtectionSpec::default();
    assert!(validate_branch_protection(Some(&spec)).is_ok());
}

#[test]
fn negative_approver_count_fails() {
    let spec = BranchProtectionSpec {
        require_approving_count: Some(-1),
        ..Default::default()
    };
    let err = validate_branch_protection(Some(&spec)).unwrap_err();
    assert_eq!(err.field, "require_approving_count");
    assert!(err.message.contains("negative"));
}

#[test]
fn oversized_approver_count_fails() {
    let spec = BranchProtectionSpec {
        require_approving_count: Some(MAX_APPROVER_COUNT + 1),
        ..Default::default()
    };
    let err = validate_branch_protection(Some(&spec)).unwrap_err();
    assert_eq!(err.field, "require_approving_count");
    assert!(err.message.contains("unreasonably high"));
}

#[test]
fn approver_count_bounds_are_inclusive() {
    for count in [0, 1, MAX_APPROVER_COUNT] {
        let spec = BranchProtectionSpec {
            require_approving_count: Some(count),
            ..Default::default()
        };
        assert!(
            validate_branch_protection(Some(&spec)).is_ok(),
            "count {count} should be valid"
        );
    }
}

#[test]
fn required_status_checks_with_empty_list_fails() {
    let spec = spec_with_checks(&[]);
    let err = validate_branch_protection(Some(&spec)).unwrap_err();
    assert_eq!(err.field, "status_checks");
    assert!(err.message.contains("no status checks specified"));
}

#[test]
fn empty_status_check_name_fails_with_index() {
    let spec = spec_with_checks(&["ci/build", "  "]);
    let err = validate_branch_protection(Some(&spec)).unwrap_err();
    assert_eq!(err.field, "status_checks[1]");
    assert!(err.message.contains("empty status check name"));
}

#[test]
fn status_checks_without_requirement_fail() {
    let spec = BranchProtectionSpec {
        status_checks: vec!["ci/build".to_string()],
        ..Default::default()
    };
    let err = validate_branch_protection(Some(&spec)).unwrap_err();
    assert_eq!(err.field, "status_checks");
    assert!(err.message.contains("require_status_checks is disabled"));
}

#[test]
fn up_to_date_without_status_checks_fails() {
    let spec = BranchProtectionSpec {
        require_up_to_date_branch: TriState::Enabled,
        ..Default::default()
    };
    let err = validate_branch_protection(Some(&spec)).unwrap_err();
    assert_eq!(err.field, "require_up_to_date_branch");
}

#[test]
fn up_to_date_with_status_checks_is_valid() {
    let spec = BranchProtectionSpec {
        require_up_to_date_branch: TriState::Enabled,
        ..spec_with_checks(&["ci/build"])
    };
    assert!(validate_branch_protection(Some(&spec)).is_ok());
}

#[test]
fn restricted_pushes_with_empty_allowlist_fail() {
    let spec = BranchProtectionSpec {
        restrict_pushes: TriState::Enabled,
        ..Default::default()
    };
    let err = validate_branch_protection(Some(&spec)).unwrap_err();
    assert_eq!(err.field, "push_allowlist");
    assert!(err.message.contains("no users/teams"));
}

#[test]
fn empty_allowlist_entry_fails_with_index() {
    let spec = BranchProtectionSpec {
        restrict_pushes: TriState::Enabled,
        push_allowlist: vec!["core-team".to_string(), "".to_string()],
        ..Default::default()
    };
    let err = validate_branch_protection(Some(&spec)).unwrap_err();
    assert_eq!(err.field, "push_allowlist[1]");
}

#[test]
fn duplicate_allowlist_entries_fail() {
    let spec = BranchProtectionSpec {
        restrict_pushes: TriState::Enabled,
        push_allowlist: vec!["core-team".to_string(), " core-team ".to_string()],
        ..Default::default()
    };
    let err = validate_branch_protection(Some(&spec)).unwrap_err();
    assert_eq!(err.field, "push_allowlist");
    assert!(err.message.contains("duplicate"));
}

#[test]
fn allowlist_ignored_when_pushes_not_restricted() {
    // The allowlist itself is only validated when restrict_pushes is on.
    let spec = BranchProtectionSpec {
        push_allowlist: vec!["dup".to_string(), "dup".to_string()],
        ..Default::default()
    };
    assert!(validate_branch_protection(Some(&spec)).is_ok());
}

#[test]
fn linear_history_conflicts_with_force_pushes() {
    let spec = BranchProtectionSpec {
        require_linear_history: TriState::Enabled,
        allow_force_pushes: TriState::Enabled,
        ..Default::default()
    };
    let err = validate_branch_protection(Some(&spec)).unwrap_err();
    assert_eq!(err.field, "allow_force_pushes");
    assert!(err.message.contains("cannot both be enabled"));
}

#[test]
fn linear_history_alone_is_valid() {
    let spec = BranchProtectionSpec {
        require_linear_history: TriState::Enabled,
        allow_force_pushes: TriState::Disabled,
        ..Default::default()
    };
    assert!(validate_branch_protection(Some(&spec)).is_ok());
}

#[test]
fn duplicate_status_checks_fail() {
    let spec = spec_with_checks(&["ci/build", "ci/test", "ci/build"]);
    let err = validate_branch_protection(Some(&spec)).unwrap_err();
    assert_eq!(err.field, "status_checks");
    assert_eq!(err.value, "ci/build");
    assert!(err.message.contains("duplicate status check"));
}

#[test]
fn conflict_is_reported_before_duplicate_status_checks() {
    // Both rules are violated; the linear-history/force-push conflict has
    // higher priority than duplicate detection.
    let spec = BranchProtectionSpec {
        require_linear_history: TriState::Enabled,
        allow_force_pushes: TriState::Enabled,
        ..spec_with_checks(&["ci/build", "ci/build"])
    };
    let err = validate_branch_protection(Some(&spec)).unwrap_err();
    assert_eq!(err.field, "allow_force_pushes");
}

fn valid_config() -> GovernanceConfig {
    GovernanceConfig {
        organization: "acme".to_string(),
        repositories: vec![RepositoryConfig::new("service")],
        ..Default::default()
    }
}

#[test]
fn valid_settings_pass() {
    assert!(validate_settings(&valid_config()).is_ok());
}

#[test]
fn missing_organization_fails() {
    let config = GovernanceConfig {
        organization: "  ".to_string(),
        ..valid_config()
    };
    let err = validate_settings(&config).unwrap_err();
    assert_eq!(err.field, "organization");
}

#[test]
fn overlong_organization_name_fails() {
    let config = GovernanceConfig {
        organization: "a".repeat(40),
        ..valid_config()
    };
    let err = validate_settings(&config).unwrap_err();
    assert_eq!(err.field, "organization");
    assert!(err.message.contains("39"));
}

#[test]
fn settings_validation_covers_branch_protection() {
    let mut config = valid_config();
    config.branch_protection.require_approving_count = Some(-3);
    let err = validate_settings(&config).unwrap_err();
    assert_eq!(err.field, "require_approving_count");
}

#[test]
fn empty_repository_list_fails() {
    let config = GovernanceConfig {
        repositories: Vec::new(),
        ..valid_config()
    };
    let err = validate_settings(&config).unwrap_err();
    assert_eq!(err.field, "repositories");
}

#[test]
fn duplicate_repository_names_fail() {
    let config = GovernanceConfig {
        repositories: vec![
            RepositoryConfig::new("service"),
            RepositoryConfig::new(" service "),
        ],
        ..valid_config()
    };
    let err = validate_settings(&config).unwrap_err();
    assert_eq!(err.field, "repositories[1].name");
    assert!(err.message.contains("duplicate"));
}

#[test]
fn empty_repository_name_fails() {
    let config = GovernanceConfig {
        repositories: vec![RepositoryConfig::new("")],
        ..valid_config()
    };
    let err = validate_settings(&config).unwrap_err();
    assert_eq!(err.field, "repositories[0].name");
}
