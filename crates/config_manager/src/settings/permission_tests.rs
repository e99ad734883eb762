//! Unit tests for team permission types.

use super::*;

#[test]
fn from_github_maps_known_levels() {
    assert_eq!(PermissionLevel::from_github("admin"), PermissionLevel::Admin);
    assert_eq!(PermissionLevel::from_github("push"), PermissionLevel::Push);
    assert_eq!(PermissionLevel::from_github("write"), PermissionLevel::Push);
    assert_eq!(PermissionLevel::from_github("pull"), PermissionLevel::Pull);
    assert_eq!(PermissionLevel::from_github("read"), PermissionLevel::Pull);
}

#[test]
fn from_github_defaults_unknown_input_to_pull() {
    assert_eq!(PermissionLevel::from_github(""), PermissionLevel::Pull);
    assert_eq!(PermissionLevel::from_github("maintain"), PermissionLevel::Pull);
    assert_eq!(PermissionLevel::from_github("triage"), PermissionLevel::Pull);
}

#[test]
fn wire_values_are_lowercase() {
    assert_eq!(PermissionLevel::Admin.as_str(), "admin");
    assert_eq!(PermissionLevel::Push.to_string(), "push");
    assert_eq!(PermissionLevel::Pull.to_string(), "pull");
}

#[test]
fn parses_team_grant_from_yaml() {
    let grant: TeamPermission = serde_yaml::from_str("name: developers\nlevel: push").unwrap();
    assert_eq!(grant.team, "developers");
    assert_eq!(grant.level, PermissionLevel::Push);
}
