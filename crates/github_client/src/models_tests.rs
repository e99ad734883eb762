//! Unit tests for client data models.

use super::*;
use serde_json::json;

#[test]
fn repository_details_tolerates_missing_fields() {
    let details: RepositoryDetails =
        serde_json::from_value(json!({ "name": "service" })).unwrap();

    assert_eq!(details.name, "service");
    assert!(details.has_wiki.is_none());
    assert!(details.allow_merge_commit.is_none());
    assert!(details.default_branch.is_none());
}

#[test]
fn branch_protection_parses_partial_response() {
    let protection: BranchProtection = serde_json::from_value(json!({
        "required_status_checks": { "strict": true, "contexts": ["ci/build"] },
        "enforce_admins": { "url": "https://api.github.com/...", "enabled": true }
    }))
    .unwrap();

    let checks = protection.required_status_checks.unwrap();
    assert!(checks.strict);
    assert_eq!(checks.contexts.unwrap(), vec!["ci/build"]);
    assert!(protection.enforce_admins.unwrap().enabled);
    assert!(protection.required_pull_request_reviews.is_none());
    assert!(protection.restrictions.is_none());
}

#[test]
fn restriction_entries_keep_missing_identifiers() {
    let restrictions: BranchRestrictions = serde_json::from_value(json!({
        "teams": [{ "slug": "core-team" }, { "name": "no-slug" }],
        "users": [{ "login": "octocat" }]
    }))
    .unwrap();

    assert_eq!(restrictions.teams.len(), 2);
    assert_eq!(restrictions.teams[0].slug.as_deref(), Some("core-team"));
    assert!(restrictions.teams[1].slug.is_none());
    assert_eq!(restrictions.users[0].login.as_deref(), Some("octocat"));
}

#[test]
fn protection_rule_input_omits_unset_fields() {
    let input = ProtectionRuleInput {
        requires_approving_reviews: Some(true),
        required_approving_review_count: Some(2),
        ..Default::default()
    };

    let value = serde_json::to_value(&input).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert_eq!(object["requiresApprovingReviews"], true);
    assert_eq!(object["requiredApprovingReviewCount"], 2);
}

#[test]
fn settings_update_omits_unset_fields() {
    let update = RepositorySettingsUpdate {
        allow_squash_merge: Some(true),
        ..Default::default()
    };
    let value = serde_json::to_value(&update).unwrap();
    assert_eq!(value, json!({ "allow_squash_merge": true }));
    assert!(!update.is_empty());
    assert!(RepositorySettingsUpdate::default().is_empty());
}

#[test]
fn overlay_emptiness_tracks_every_field() {
    assert!(ProtectionOverlay::default().is_empty());
    let overlay = ProtectionOverlay {
        allow_deletions: Some(false),
        ..Default::default()
    };
    assert!(!overlay.is_empty());
}
