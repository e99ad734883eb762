//! GraphQL operations.
//!
//! The GraphQL API carries the repository lookup, the repository feature
//! mutation, branch protection rule creation, and all label operations.
//! Queries are fixed documents executed through octocrab's GraphQL endpoint
//! with `serde_json` variables; list operations are cursor-paginated with a
//! fixed page size of 100 and materialize the complete result before
//! returning.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use crate::errors::Error;
use crate::models::{
    FeatureUpdate, LabelPayload, ProtectionRuleInput, RepositoryFacts, RepositoryId,
    RepositoryLabel,
};
use crate::{GitHubClient, GraphClient, LabelsClient};

#[cfg(test)]
#[path = "graphql_tests.rs"]
mod tests;

/// Fixed page size for cursor-paginated queries.
const PAGE_SIZE: u32 = 100;

const REPOSITORY_QUERY: &str = r#"
query($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) {
    id
    hasWikiEnabled
    hasIssuesEnabled
    hasProjectsEnabled
  }
}"#;

const UPDATE_REPOSITORY_MUTATION: &str = r#"
mutation($input: UpdateRepositoryInput!) {
  updateRepository(input: $input) {
    repository {
      id
      hasWikiEnabled
      hasIssuesEnabled
      hasProjectsEnabled
    }
  }
}"#;

const CREATE_BRANCH_PROTECTION_MUTATION: &str = r#"
mutation($input: CreateBranchProtectionRuleInput!) {
  createBranchProtectionRule(input: $input) {
    branchProtectionRule {
      id
      pattern
    }
  }
}"#;

const LIST_LABELS_QUERY: &str = r#"
query($owner: String!, $name: String!, $pageSize: Int!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    labels(first: $pageSize, after: $cursor) {
      nodes {
        id
        name
        color
        description
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}"#;

const CREATE_LABEL_MUTATION: &str = r#"
mutation($input: CreateLabelInput!) {
  createLabel(input: $input) {
    label {
      id
      name
    }
  }
}"#;

const UPDATE_LABEL_MUTATION: &str = r#"
mutation($input: UpdateLabelInput!) {
  updateLabel(input: $input) {
    label {
      id
      name
    }
  }
}"#;

const DELETE_LABEL_MUTATION: &str = r#"
mutation($input: DeleteLabelInput!) {
  deleteLabel(input: $input) {
    clientMutationId
  }
}"#;

impl GitHubClient {
    /// Executes one GraphQL document and surfaces response-level errors.
    ///
    /// GraphQL failures arrive as an `errors` array in a 200 response; a
    /// `NOT_FOUND` error type classifies as [`Error::NotFound`], everything
    /// else as [`Error::Graph`].
    async fn graphql_request(
        &self,
        operation: &str,
        repository: &str,
        query: &str,
        variables: Value,
    ) -> Result<Value, Error> {
        let payload = json!({ "query": query, "variables": variables });
        debug!(operation = operation, repository = repository, "executing GraphQL request");

        let response: Value = self
            .octocrab()
            .graphql(&payload)
            .await
            .map_err(|e| Error::from_octocrab(operation, repository, e))?;

        if let Some(errors) = response.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                if errors.iter().any(|e| {
                    e.get("type").and_then(Value::as_str) == Some("NOT_FOUND")
                }) {
                    return Err(Error::NotFound {
                        operation: operation.to_string(),
                        repository: repository.to_string(),
                        source: None,
                    });
                }
                let message = errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(Error::Graph {
                    operation: operation.to_string(),
                    repository: repository.to_string(),
                    message,
                });
            }
        }

        Ok(response)
    }
}

#[async_trait]
impl GraphClient for GitHubClient {
    /// Looks up a repository by owner and name.
    ///
    /// Returns the repository's opaque GraphQL ID together with its current
    /// feature flags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the repository cannot be retrieved.
    #[instrument(skip(self), fields(owner = %owner, name = %name))]
    async fn resolve_repository(&self, owner: &str, name: &str) -> Result<RepositoryFacts, Error> {
        let repository = format!("{owner}/{name}");
        let response = self
            .graphql_request(
                "get repository",
                &repository,
                REPOSITORY_QUERY,
                json!({ "owner": owner, "name": name }),
            )
            .await?;

        let repo = &response["data"]["repository"];
        if repo.is_null() {
            return Err(Error::NotFound {
                operation: "get repository".to_string(),
                repository,
                source: None,
            });
        }

        let id = repo["id"].as_str().ok_or_else(|| Error::InvalidResponse {
            operation: "get repository".to_string(),
            repository: repository.clone(),
        })?;

        let facts = RepositoryFacts {
            id: RepositoryId(id.to_string()),
            has_wiki: repo["hasWikiEnabled"].as_bool().unwrap_or_default(),
            has_issues: repo["hasIssuesEnabled"].as_bool().unwrap_or_default(),
            has_projects: repo["hasProjectsEnabled"].as_bool().unwrap_or_default(),
        };

        info!(
            repository = repository,
            wiki = facts.has_wiki,
            issues = facts.has_issues,
            project = facts.has_projects,
            "get repository results"
        );
        Ok(facts)
    }

    /// Updates repository feature flags through the repository mutation.
    ///
    /// Only flags carrying a value are included in the mutation input; unset
    /// flags leave the live value untouched.
    #[instrument(skip(self, features), fields(repository = %repository))]
    async fn update_repository_features(
        &self,
        repository: &str,
        id: &RepositoryId,
        features: &FeatureUpdate,
    ) -> Result<(), Error> {
        let mut input = serde_json::Map::new();
        input.insert("repositoryId".to_string(), json!(id.0));
        if let Some(wiki) = features.wiki {
            input.insert("hasWikiEnabled".to_string(), json!(wiki));
        }
        if let Some(issues) = features.issues {
            input.insert("hasIssuesEnabled".to_string(), json!(issues));
        }
        if let Some(projects) = features.projects {
            input.insert("hasProjectsEnabled".to_string(), json!(projects));
        }
        if let Some(discussions) = features.discussions {
            input.insert("hasDiscussionsEnabled".to_string(), json!(discussions));
        }

        self.graphql_request(
            "update repository",
            repository,
            UPDATE_REPOSITORY_MUTATION,
            json!({ "input": Value::Object(input) }),
        )
        .await?;

        info!(repository = repository, "updated repository features");
        Ok(())
    }

    /// Creates a branch protection rule for the given pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BranchProtectionRuleExists`] when a rule already
    /// exists for the pattern; this is an expected condition the caller may
    /// treat as "update needed".
    #[instrument(skip(self, rule), fields(repository = %repository, pattern = %pattern))]
    async fn create_branch_protection_rule(
        &self,
        repository: &str,
        id: &RepositoryId,
        pattern: &str,
        rule: &ProtectionRuleInput,
    ) -> Result<(), Error> {
        let mut input = match serde_json::to_value(rule) {
            Ok(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        input.insert("repositoryId".to_string(), json!(id.0));
        input.insert("pattern".to_string(), json!(pattern));

        let result = self
            .graphql_request(
                "create branch protection rule",
                repository,
                CREATE_BRANCH_PROTECTION_MUTATION,
                json!({ "input": Value::Object(input) }),
            )
            .await;

        match result {
            Ok(_) => {
                info!(
                    repository = repository,
                    pattern = pattern,
                    "created branch protection rule"
                );
                Ok(())
            }
            Err(Error::Graph { message, .. }) if message.contains("Name already protected") => {
                info!(
                    pattern = pattern,
                    reason = "branch protection rule already exists",
                    "createBranchProtectionRule rejected"
                );
                Err(Error::BranchProtectionRuleExists {
                    pattern: pattern.to_string(),
                })
            }
            Err(other) => Err(other),
        }
    }
}

#[async_trait]
impl LabelsClient for GitHubClient {
    /// Lists every label on the repository.
    ///
    /// Pagination is handled here; the returned list is complete and
    /// materialized, not a lazy cursor.
    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn list_labels(&self, owner: &str, repo: &str) -> Result<Vec<RepositoryLabel>, Error> {
        let repository = format!("{owner}/{repo}");
        let mut labels = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let response = self
                .graphql_request(
                    "list labels",
                    &repository,
                    LIST_LABELS_QUERY,
                    json!({
                        "owner": owner,
                        "name": repo,
                        "pageSize": PAGE_SIZE,
                        "cursor": cursor,
                    }),
                )
                .await?;

            let connection = &response["data"]["repository"]["labels"];
            if connection.is_null() {
                return Err(Error::NotFound {
                    operation: "list labels".to_string(),
                    repository,
                    source: None,
                });
            }

            let nodes = connection["nodes"].as_array().cloned().unwrap_or_default();
            for node in nodes {
                let label: RepositoryLabel =
                    serde_json::from_value(node).map_err(|_| Error::InvalidResponse {
                        operation: "list labels".to_string(),
                        repository: repository.clone(),
                    })?;
                labels.push(label);
            }

            let page_info = &connection["pageInfo"];
            if page_info["hasNextPage"].as_bool().unwrap_or(false) {
                cursor = page_info["endCursor"].as_str().map(str::to_string);
            } else {
                break;
            }
        }

        debug!(repository = repository, count = labels.len(), "labels retrieved");
        Ok(labels)
    }

    /// Creates a label on the repository.
    #[instrument(skip(self, label), fields(owner = %owner, repo = %repo, name = %label.name))]
    async fn create_label(
        &self,
        owner: &str,
        repo: &str,
        id: &RepositoryId,
        label: &LabelPayload,
    ) -> Result<(), Error> {
        let repository = format!("{owner}/{repo}");
        self.graphql_request(
            "create label",
            &repository,
            CREATE_LABEL_MUTATION,
            json!({
                "input": {
                    "repositoryId": id.0,
                    "name": label.name,
                    "color": label.color,
                    "description": label.description,
                }
            }),
        )
        .await?;
        Ok(())
    }

    /// Updates an existing label in place, keyed by its node ID.
    #[instrument(skip(self, label), fields(owner = %owner, repo = %repo, name = %label.name))]
    async fn update_label(
        &self,
        owner: &str,
        repo: &str,
        label_id: &str,
        label: &LabelPayload,
    ) -> Result<(), Error> {
        let repository = format!("{owner}/{repo}");
        self.graphql_request(
            "update label",
            &repository,
            UPDATE_LABEL_MUTATION,
            json!({
                "input": {
                    "id": label_id,
                    "name": label.name,
                    "color": label.color,
                    "description": label.description,
                }
            }),
        )
        .await?;
        Ok(())
    }

    /// Deletes a label, keyed by its node ID.
    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn delete_label(&self, owner: &str, repo: &str, label_id: &str) -> Result<(), Error> {
        let repository = format!("{owner}/{repo}");
        self.graphql_request(
            "delete label",
            &repository,
            DELETE_LABEL_MUTATION,
            json!({ "input": { "id": label_id } }),
        )
        .await?;
        Ok(())
    }
}
