//! Unit tests for the permission/feature mapper.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use config_manager::{
    PermissionLevel, RepositoryDefaults, TeamPermission, TriState,
};
use github_client::{
    BranchProtection, Error, ProtectionOverlay, RepositoryDetails, RepositoryFacts, RepositoryId,
    TeamAccess,
};

use super::*;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Grant {
        team: String,
        repo: String,
        permission: String,
    },
    Resolve {
        repo: String,
    },
    Features {
        repository: String,
        features: FeatureUpdate,
    },
    Settings {
        repo: String,
        settings: RepositorySettingsUpdate,
    },
}

#[derive(Default)]
struct FakeApi {
    calls: Mutex<Vec<Call>>,
    fail_grants_for: HashSet<String>,
    fail_resolve_for: HashSet<String>,
    fail_settings_for: HashSet<String>,
}

impl FakeApi {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

fn induced(operation: &str) -> Error {
    Error::Graph {
        operation: operation.to_string(),
        repository: "induced".to_string(),
        message: "induced failure".to_string(),
    }
}

#[async_trait]
impl TeamsClient for FakeApi {
    async fn grant_team_permission(
        &self,
        _org: &str,
        team_slug: &str,
        repo: &str,
        permission: &str,
    ) -> Result<(), Error> {
        if self.fail_grants_for.contains(team_slug) {
            return Err(induced("add team permission"));
        }
        self.calls.lock().unwrap().push(Call::Grant {
            team: team_slug.to_string(),
            repo: repo.to_string(),
            permission: permission.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl GraphClient for FakeApi {
    async fn resolve_repository(&self, _owner: &str, name: &str) -> Result<RepositoryFacts, Error> {
        if self.fail_resolve_for.contains(name) {
            return Err(induced("get repository"));
        }
        self.calls.lock().unwrap().push(Call::Resolve {
            repo: name.to_string(),
        });
        Ok(RepositoryFacts {
            id: RepositoryId(format!("R_{name}")),
            has_wiki: true,
            has_issues: true,
            has_projects: false,
        })
    }

    async fn update_repository_features(
        &self,
        repository: &str,
        _id: &RepositoryId,
        features: &FeatureUpdate,
    ) -> Result<(), Error> {
        self.calls.lock().unwrap().push(Call::Features {
            repository: repository.to_string(),
            features: features.clone(),
        });
        Ok(())
    }

    async fn create_branch_protection_rule(
        &self,
        _repository: &str,
        _id: &RepositoryId,
        _pattern: &str,
        _rule: &github_client::ProtectionRuleInput,
    ) -> Result<(), Error> {
        unimplemented!("not used by the mapper")
    }
}

#[async_trait]
impl RepositoriesClient for FakeApi {
    async fn get_repository_details(
        &self,
        _owner: &str,
        _repo: &str,
    ) -> Result<RepositoryDetails, Error> {
        unimplemented!("not used by the mapper")
    }

    async fn list_repository_teams(
        &self,
        _owner: &str,
        _repo: &str,
    ) -> Result<Vec<TeamAccess>, Error> {
        unimplemented!("not used by the mapper")
    }

    async fn get_branch_protection(
        &self,
        _owner: &str,
        _repo: &str,
        _branch: &str,
    ) -> Result<BranchProtection, Error> {
        unimplemented!("not used by the mapper")
    }

    async fn update_repository_settings(
        &self,
        _owner: &str,
        repo: &str,
        settings: &RepositorySettingsUpdate,
    ) -> Result<(), Error> {
        if self.fail_settings_for.contains(repo) {
            return Err(induced("update repository settings"));
        }
        self.calls.lock().unwrap().push(Call::Settings {
            repo: repo.to_string(),
            settings: settings.clone(),
        });
        Ok(())
    }

    async fn update_branch_protection(
        &self,
        _owner: &str,
        _repo: &str,
        _branch: &str,
        _overlay: &ProtectionOverlay,
    ) -> Result<(), Error> {
        unimplemented!("not used by the mapper")
    }
}

fn base_config() -> GovernanceConfig {
    GovernanceConfig {
        organization: "acme".to_string(),
        team_permissions: vec![
            TeamPermission {
                team: "developers".to_string(),
                level: PermissionLevel::Push,
            },
            TeamPermission {
                team: "platform".to_string(),
                level: PermissionLevel::Admin,
            },
        ],
        repositories: vec![
            RepositoryConfig {
                wiki: TriState::Disabled,
                ..RepositoryConfig::new("service")
            },
            RepositoryConfig::new("docs"),
        ],
        defaults: Some(RepositoryDefaults {
            wiki: TriState::Enabled,
            issues: TriState::Enabled,
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[tokio::test]
async fn validation_failure_aborts_with_zero_side_effects() {
    let fake = FakeApi::default();
    let config = GovernanceConfig {
        organization: String::new(),
        ..base_config()
    };

    let err = map_permissions(&fake, &config).await.unwrap_err();
    assert!(matches!(err, WardenError::Validation(_)));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn grants_are_issued_per_team_per_repository() {
    let fake = FakeApi::default();
    let report = map_permissions(&fake, &base_config()).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.applied.len(), 2);

    let grants: Vec<_> = fake
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Grant { .. }))
        .collect();
    // 2 repositories x 2 teams, sequential, not batched.
    assert_eq!(grants.len(), 4);
    assert!(grants.contains(&Call::Grant {
        team: "developers".to_string(),
        repo: "service".to_string(),
        permission: "push".to_string(),
    }));
    assert!(grants.contains(&Call::Grant {
        team: "platform".to_string(),
        repo: "docs".to_string(),
        permission: "admin".to_string(),
    }));
}

#[tokio::test]
async fn feature_flags_resolve_repository_over_defaults() {
    let fake = FakeApi::default();
    map_permissions(&fake, &base_config()).await.unwrap();

    let features: Vec<_> = fake
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Features {
                repository,
                features,
            } => Some((repository, features)),
            _ => None,
        })
        .collect();
    assert_eq!(features.len(), 2);

    // service disables the wiki locally, overriding the enabled default.
    let service = &features.iter().find(|(r, _)| r == "acme/service").unwrap().1;
    assert_eq!(service.wiki, Some(false));
    assert_eq!(service.issues, Some(true));
    // projects is set at neither level and stays out of the mutation.
    assert!(service.projects.is_none());
    assert!(service.discussions.is_none());

    // docs inherits both defaults.
    let docs = &features.iter().find(|(r, _)| r == "acme/docs").unwrap().1;
    assert_eq!(docs.wiki, Some(true));
    assert_eq!(docs.issues, Some(true));
}

#[tokio::test]
async fn feature_mutation_is_skipped_when_nothing_is_set() {
    let fake = FakeApi::default();
    let config = GovernanceConfig {
        organization: "acme".to_string(),
        repositories: vec![RepositoryConfig::new("bare")],
        ..Default::default()
    };

    let report = map_permissions(&fake, &config).await.unwrap();
    assert!(report.is_success());
    assert!(fake
        .calls()
        .iter()
        .all(|c| !matches!(c, Call::Features { .. })));
}

#[tokio::test]
async fn team_failure_is_recorded_and_batch_continues() {
    let fake = FakeApi {
        fail_grants_for: HashSet::from(["developers".to_string()]),
        ..Default::default()
    };
    let report = map_permissions(&fake, &base_config()).await.unwrap();

    // Both repositories report the failing team; neither counts as applied.
    assert_eq!(report.errors.len(), 2);
    assert!(report
        .errors
        .iter()
        .all(|e| e.team.as_deref() == Some("developers")));
    assert!(report.applied.is_empty());

    // The other team was still granted on both repositories.
    let platform_grants = fake
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Grant { team, .. } if team == "platform"))
        .count();
    assert_eq!(platform_grants, 2);
}

#[tokio::test]
async fn resolve_failure_skips_feature_steps_for_that_repository() {
    let fake = FakeApi {
        fail_resolve_for: HashSet::from(["service".to_string()]),
        ..Default::default()
    };
    let report = map_permissions(&fake, &base_config()).await.unwrap();

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].repository, "acme/service");
    // docs still succeeded.
    assert_eq!(report.applied.len(), 1);
    assert_eq!(report.applied[0].name, "docs");

    // No feature mutation was attempted for the unresolved repository.
    assert!(fake
        .calls()
        .iter()
        .all(|c| !matches!(c, Call::Features { repository, .. } if repository == "acme/service")));
}

#[tokio::test]
async fn advanced_settings_carry_default_branch_and_branch_deletion() {
    let fake = FakeApi::default();
    let config = GovernanceConfig {
        organization: "acme".to_string(),
        repositories: vec![RepositoryConfig {
            default_branch: Some("main".to_string()),
            delete_branch_on_merge: TriState::Enabled,
            ..RepositoryConfig::new("service")
        }],
        ..Default::default()
    };

    map_permissions(&fake, &config).await.unwrap();

    let settings: Vec<_> = fake
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Settings { repo, settings } => Some((repo, settings)),
            _ => None,
        })
        .collect();
    assert_eq!(settings.len(), 1);
    assert_eq!(settings[0].1.default_branch.as_deref(), Some("main"));
    assert_eq!(settings[0].1.delete_branch_on_merge, Some(true));
    assert!(settings[0].1.allow_merge_commit.is_none());
}

#[tokio::test]
async fn merge_strategies_validate_before_any_call() {
    let fake = FakeApi::default();
    let mut config = base_config();
    config.branch_protection.require_approving_count = Some(-1);

    let err = update_merge_strategies(&fake, &config).await.unwrap_err();
    assert!(matches!(err, WardenError::Validation(_)));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn merge_strategies_apply_only_set_flags_to_every_repository() {
    let fake = FakeApi::default();
    let mut config = base_config();
    config.branch_protection.allow_squash_merge = TriState::Enabled;
    config.branch_protection.allow_merge_commit = TriState::Disabled;

    let report = update_merge_strategies(&fake, &config).await.unwrap();
    assert!(report.is_success());
    assert_eq!(report.applied.len(), 2);

    let settings: Vec<_> = fake
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Settings { repo, settings } => Some((repo, settings)),
            _ => None,
        })
        .collect();
    assert_eq!(settings.len(), 2);
    for (_, update) in &settings {
        assert_eq!(update.allow_squash_merge, Some(true));
        assert_eq!(update.allow_merge_commit, Some(false));
        assert!(update.allow_rebase_merge.is_none());
        assert!(update.default_branch.is_none());
    }
}

#[tokio::test]
async fn merge_strategy_failure_is_collected_per_repository() {
    let fake = FakeApi {
        fail_settings_for: HashSet::from(["service".to_string()]),
        ..Default::default()
    };
    let mut config = base_config();
    config.branch_protection.allow_rebase_merge = TriState::Enabled;

    let report = update_merge_strategies(&fake, &config).await.unwrap();
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].repository, "acme/service");
    assert_eq!(report.applied.len(), 1);
    assert_eq!(report.applied[0].name, "docs");
}
