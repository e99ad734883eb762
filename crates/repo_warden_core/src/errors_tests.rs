//! Unit tests for engine error types.

use super::*;
use std::error::Error as _;

#[test]
fn operation_error_keeps_its_cause_reachable() {
    let err = WardenError::operation(
        "create label bug",
        "acme/service",
        github_client::Error::BranchProtectionRuleExists {
            pattern: "main".to_string(),
        },
    );

    assert!(err.to_string().contains("create label bug"));
    assert!(err.to_string().contains("acme/service"));
    assert!(err.source().is_some());
    assert_eq!(err.github_kind(), Some(ErrorKind::RuleAlreadyExists));
}

#[test]
fn validation_errors_have_no_github_kind() {
    let err = WardenError::from(config_manager::ValidationError::new(
        "organization",
        "",
        "organization must be specified",
    ));
    assert!(err.github_kind().is_none());
}

#[test]
fn batch_error_reports_totals_and_details() {
    let batch = BatchError {
        total: 3,
        success_count: 1,
        error_count: 2,
        errors: vec![
            RepositoryError::repository(
                "acme/a",
                WardenError::InvalidRepoFormat("acme-a".to_string()),
            ),
            RepositoryError::team(
                "acme/b",
                "developers",
                WardenError::operation(
                    "add team permission",
                    "acme/b",
                    github_client::Error::TokenNotFound,
                ),
            ),
        ],
    };

    let rendered = batch.to_string();
    assert!(rendered.contains("2 of 3 failed"));
    assert!(rendered.contains("1 successful"));

    let details = batch.detailed_errors();
    assert_eq!(details.len(), 2);
    assert!(details[0].starts_with("acme/a:"));
    assert!(details[1].contains("team developers"));
}
