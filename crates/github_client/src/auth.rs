//! Token validation and transport configuration.
//!
//! Tokens are validated by format before a client is built so that a missing
//! or malformed token fails fast as a configuration error instead of as a
//! confusing 401 halfway through a reconciliation run.

use std::env;
use std::time::Duration;

use regex::Regex;
use tracing::warn;

use crate::errors::Error;

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;

/// Environment variable holding the GitHub token.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Prefix for transport configuration environment variables.
pub const ENV_VAR_PREFIX: &str = "REPO_WARDEN_";

// GitHub tokens have specific patterns:
// - Classic tokens: ghp_[A-Za-z0-9]{36}
// - Fine-grained tokens: github_pat_[A-Za-z0-9_]+
// - GitHub App tokens: ghs_[A-Za-z0-9]{36}
// - OAuth tokens: gho_[A-Za-z0-9]{36}
// - Refresh tokens: ghr_[A-Za-z0-9]{36}
// - SAML tokens: ghu_[A-Za-z0-9]{36}
const TOKEN_PATTERNS: [&str; 6] = [
    r"^ghp_[A-Za-z0-9]{36}$",
    r"^github_pat_[A-Za-z0-9_]{22,255}$",
    r"^ghs_[A-Za-z0-9]{36}$",
    r"^gho_[A-Za-z0-9]{36}$",
    r"^ghr_[A-Za-z0-9]{36}$",
    r"^ghu_[A-Za-z0-9]{36}$",
];

/// Validates a GitHub token's format.
///
/// # Errors
///
/// Returns [`Error::TokenNotFound`] for an empty token and
/// [`Error::InvalidToken`] when the token matches none of the known formats.
pub fn validate_token(token: &str) -> Result<(), Error> {
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::TokenNotFound);
    }

    for pattern in TOKEN_PATTERNS {
        let re = Regex::new(pattern).expect("token patterns are valid regexes");
        if re.is_match(token) {
            return Ok(());
        }
    }

    Err(Error::InvalidToken)
}

/// Reads and validates the GitHub token from the environment.
///
/// # Errors
///
/// Returns [`Error::TokenNotFound`] when the variable is unset and
/// [`Error::InvalidToken`] when its value has an unknown format.
pub fn token_from_env() -> Result<String, Error> {
    let token = env::var(TOKEN_ENV_VAR).map_err(|_| Error::TokenNotFound)?;
    validate_token(&token)?;
    Ok(token.trim().to_string())
}

/// Transport retry and timeout budget.
///
/// The transport retries failed requests transparently; callers of the client
/// see each call as either eventually succeeding or returning a terminal
/// error once the budget is exhausted. The wait interval grows linearly,
/// scaled by the multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Number of retries after the first attempt.
    pub max_retries: u32,
    /// Base wait between attempts, in seconds.
    pub wait_interval_seconds: u64,
    /// Scale factor applied to the wait interval.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            max_retries: 3,
            wait_interval_seconds: 10,
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Builds the configuration from `REPO_WARDEN_*` environment variables.
    ///
    /// Recognized variables: `TIMEOUT_SECONDS`, `MAX_RETRIES`,
    /// `WAIT_INTERVAL_SECONDS`, `BACKOFF_MULTIPLIER` (each with the prefix).
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when a variable is set but
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, Error> {
        let defaults = Self::default();
        let timeout_seconds = parse_env_u64("TIMEOUT_SECONDS", defaults.timeout_seconds)?;
        let max_retries = parse_env_u64("MAX_RETRIES", u64::from(defaults.max_retries))? as u32;
        let wait_interval_seconds =
            parse_env_u64("WAIT_INTERVAL_SECONDS", defaults.wait_interval_seconds)?;

        let mut multiplier = defaults.multiplier;
        let multiplier_var = format!("{ENV_VAR_PREFIX}BACKOFF_MULTIPLIER");
        if let Ok(raw) = env::var(&multiplier_var) {
            match raw.parse::<f64>() {
                Ok(parsed) => multiplier = parsed,
                Err(_) => {
                    warn!(name = %multiplier_var, value = %raw, "invalid env; using default");
                    return Err(Error::InvalidConfiguration {
                        name: multiplier_var,
                        value: raw,
                    });
                }
            }
        }

        Ok(Self {
            timeout_seconds,
            max_retries,
            wait_interval_seconds,
            multiplier,
        })
    }

    /// The per-request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Upper bound on total time spent on one call, retries included.
    pub fn total_budget(&self) -> Duration {
        let waits = self.wait_interval_seconds as f64 * self.multiplier * self.max_retries as f64;
        let attempts = self.timeout_seconds * (u64::from(self.max_retries) + 1);
        Duration::from_secs(attempts + waits as u64)
    }
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, Error> {
    let var = format!("{ENV_VAR_PREFIX}{name}");
    match env::var(&var) {
        Err(_) => Ok(default),
        Ok(raw) => raw.parse::<u64>().map_err(|_| {
            warn!(name = %var, value = %raw, "invalid env; using default");
            Error::InvalidConfiguration {
                name: var,
                value: raw,
            }
        }),
    }
}
