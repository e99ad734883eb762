//! Unit tests for the branch protection specification.

use super::*;

#[test]
fn default_spec_is_empty() {
    let spec = BranchProtectionSpec::default();
    assert!(spec.is_empty());
    assert!(!spec.has_merge_strategy());
}

#[test]
fn parses_the_original_yaml_key_names() {
    let yaml = r#"
require_pull_request_reviews: true
require_approving_count: 2
require_code_owners: false
require_status_checks: true
status_checks:
  - ci/build
  - ci/test
require_up_to_date_branch: true
enforce_admins: true
restrict_pushes: true
push_allowlist:
  - core-team
require_linear_history: true
"#;
    let spec: BranchProtectionSpec = serde_yaml::from_str(yaml).unwrap();

    assert!(spec.require_pull_request_reviews.is_enabled());
    assert_eq!(spec.require_approving_count, Some(2));
    assert_eq!(spec.require_code_owners.as_bool(), Some(false));
    assert!(spec.require_status_checks.is_enabled());
    assert_eq!(spec.status_checks, vec!["ci/build", "ci/test"]);
    assert!(spec.require_up_to_date_branch.is_enabled());
    assert!(spec.enforce_admins.is_enabled());
    assert!(spec.restrict_pushes.is_enabled());
    assert_eq!(spec.push_allowlist, vec!["core-team"]);
    assert!(spec.require_linear_history.is_enabled());

    // Keys that were not present stay unset.
    assert!(spec.allow_force_pushes.is_unset());
    assert!(spec.allow_deletions.is_unset());
    assert!(spec.require_conversation_resolution.is_unset());
}

#[test]
fn unset_fields_are_omitted_from_serialization() {
    let spec = BranchProtectionSpec {
        require_pull_request_reviews: TriState::Enabled,
        ..Default::default()
    };
    let json = serde_json::to_value(&spec).unwrap();
    let object = json.as_object().unwrap();

    assert_eq!(object.len(), 1);
    assert_eq!(object["require_pull_request_reviews"], true);
}

#[test]
fn has_merge_strategy_detects_any_flag() {
    let spec = BranchProtectionSpec {
        allow_squash_merge: TriState::Disabled,
        ..Default::default()
    };
    assert!(spec.has_merge_strategy());
}
