//! Error types for GitHub client operations.
//!
//! Every API-boundary error carries the operation and repository it happened
//! on, classifies into an [`ErrorKind`], and keeps its underlying cause
//! reachable through `std::error::Error::source` for unwrapping.

use http::StatusCode;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// The category an error belongs to.
///
/// Kinds are assigned at the API boundary from the HTTP status code (401 is
/// authentication, 403 permission-denied, 404 not-found, 429 rate-limit) or
/// from the failure mode (transport problems are network, token and
/// configuration problems are validation). A pre-existing branch protection
/// rule gets its own kind because callers treat it as "update needed" rather
/// than a hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was not authenticated (HTTP 401) or the token is unusable.
    Authentication,
    /// The token lacks the required permission (HTTP 403).
    PermissionDenied,
    /// The requested resource does not exist (HTTP 404).
    NotFound,
    /// The API rate limit was exhausted (HTTP 429).
    RateLimit,
    /// The request never produced a usable HTTP response.
    Network,
    /// Configuration or token validation failed before any request.
    Validation,
    /// A branch protection rule already exists for the requested pattern.
    RuleAlreadyExists,
    /// Any other API failure.
    Api,
}

/// Errors that can occur during GitHub client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request was rejected as unauthenticated.
    #[error("authentication failed for {operation} on {repository}: {message}")]
    Authentication {
        /// The logical operation that failed.
        operation: String,
        /// The `owner/repo` the operation targeted, if any.
        repository: String,
        /// Details from the API response.
        message: String,
        /// The underlying transport error.
        #[source]
        source: Option<octocrab::Error>,
    },

    /// The token is valid but lacks the required permission.
    #[error("permission denied for {operation} on {repository}: {message}")]
    PermissionDenied {
        /// The logical operation that failed.
        operation: String,
        /// The `owner/repo` the operation targeted, if any.
        repository: String,
        /// Details from the API response.
        message: String,
        /// The underlying transport error.
        #[source]
        source: Option<octocrab::Error>,
    },

    /// The requested resource does not exist or is not visible.
    #[error("resource not found for {operation} on {repository}")]
    NotFound {
        /// The logical operation that failed.
        operation: String,
        /// The `owner/repo` the operation targeted, if any.
        repository: String,
        /// The underlying transport error.
        #[source]
        source: Option<octocrab::Error>,
    },

    /// The API rate limit has been exhausted.
    #[error("rate limit exceeded for {operation} on {repository}")]
    RateLimited {
        /// The logical operation that failed.
        operation: String,
        /// The `owner/repo` the operation targeted, if any.
        repository: String,
        /// The underlying transport error.
        #[source]
        source: Option<octocrab::Error>,
    },

    /// Any other HTTP-level API failure.
    #[error("GitHub API error [{status}] for {operation} on {repository}: {message}")]
    Api {
        /// The HTTP status code of the response, 0 when unknown.
        status: u16,
        /// The logical operation that failed.
        operation: String,
        /// The `owner/repo` the operation targeted, if any.
        repository: String,
        /// Details from the API response.
        message: String,
        /// The underlying transport error.
        #[source]
        source: Option<octocrab::Error>,
    },

    /// The request never reached GitHub or produced no usable response.
    #[error("network error during {operation}: {message}")]
    Network {
        /// The logical operation that failed.
        operation: String,
        /// Details of the transport failure.
        message: String,
        /// The underlying transport error.
        #[source]
        source: Option<octocrab::Error>,
    },

    /// The GraphQL endpoint answered 200 but reported query errors.
    #[error("GraphQL error for {operation} on {repository}: {message}")]
    Graph {
        /// The logical operation that failed.
        operation: String,
        /// The `owner/repo` the operation targeted.
        repository: String,
        /// The joined GraphQL error messages.
        message: String,
    },

    /// A branch protection rule already exists for the pattern.
    ///
    /// Expected and recoverable: callers may treat this as "update needed"
    /// rather than "operation failed".
    #[error("branch protection rule already exists for pattern {pattern}")]
    BranchProtectionRuleExists {
        /// The branch pattern the rule was created for.
        pattern: String,
    },

    /// A GraphQL response did not have the expected shape.
    #[error("invalid response format for {operation} on {repository}")]
    InvalidResponse {
        /// The logical operation that failed.
        operation: String,
        /// The `owner/repo` the operation targeted.
        repository: String,
    },

    /// The GitHub token does not match any known token format.
    #[error("GitHub token format is invalid")]
    InvalidToken,

    /// No GitHub token was provided in the environment.
    #[error("GITHUB_TOKEN environment variable not set")]
    TokenNotFound,

    /// A client configuration value could not be parsed.
    #[error("invalid configuration value for {name}: '{value}'")]
    InvalidConfiguration {
        /// The configuration key.
        name: String,
        /// The rejected value.
        value: String,
    },
}

impl Error {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Authentication { .. } => ErrorKind::Authentication,
            Error::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::RateLimited { .. } => ErrorKind::RateLimit,
            Error::Network { .. } => ErrorKind::Network,
            Error::BranchProtectionRuleExists { .. } => ErrorKind::RuleAlreadyExists,
            Error::InvalidToken | Error::TokenNotFound | Error::InvalidConfiguration { .. } => {
                ErrorKind::Validation
            }
            Error::Api { .. } | Error::Graph { .. } | Error::InvalidResponse { .. } => {
                ErrorKind::Api
            }
        }
    }

    /// Classifies an HTTP status code into an error, without a transport cause.
    ///
    /// Used for raw responses whose status was checked directly.
    pub(crate) fn from_status(status: StatusCode, operation: &str, repository: &str) -> Error {
        Self::classify(status, operation, repository, status_message(status), None)
    }

    /// Wraps an octocrab error with operation and repository context.
    pub(crate) fn from_octocrab(operation: &str, repository: &str, err: octocrab::Error) -> Error {
        match err {
            octocrab::Error::GitHub { ref source, .. } => {
                let status = source.status_code;
                let message = source.message.clone();
                Self::classify(status, operation, repository, message, Some(err))
            }
            other => Error::Network {
                operation: operation.to_string(),
                message: other.to_string(),
                source: Some(other),
            },
        }
    }

    fn classify(
        status: StatusCode,
        operation: &str,
        repository: &str,
        message: String,
        source: Option<octocrab::Error>,
    ) -> Error {
        let operation = operation.to_string();
        let repository = repository.to_string();
        match status {
            StatusCode::UNAUTHORIZED => Error::Authentication {
                operation,
                repository,
                message,
                source,
            },
            StatusCode::FORBIDDEN => Error::PermissionDenied {
                operation,
                repository,
                message,
                source,
            },
            StatusCode::NOT_FOUND => Error::NotFound {
                operation,
                repository,
                source,
            },
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimited {
                operation,
                repository,
                source,
            },
            _ => Error::Api {
                status: status.as_u16(),
                operation,
                repository,
                message,
                source,
            },
        }
    }
}

fn status_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("unexpected status")
        .to_string()
}
