//! CLI error types.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors surfaced by the command-line interface.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}")]
    ConfigRead {
        /// Path of the file.
        path: String,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the governance model.
    #[error("failed to parse configuration file {path}")]
    ConfigParse {
        /// Path of the file.
        path: String,
        /// The parse failure.
        #[source]
        source: serde_yaml::Error,
    },

    /// A file other than the configuration could not be accessed.
    #[error("failed to access {path}")]
    File {
        /// Path of the file.
        path: String,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Reading an existing CSV file's header row failed.
    #[error("failed to read existing CSV headers from {path}")]
    CsvHeaders {
        /// Path of the file.
        path: String,
        /// The CSV failure.
        #[source]
        source: csv::Error,
    },

    /// Rendering imported configuration to YAML failed.
    #[error("failed to render configuration as YAML")]
    Render(#[from] serde_yaml::Error),

    /// A client-side failure (token, transport, API).
    #[error(transparent)]
    Client(#[from] github_client::Error),

    /// An engine failure.
    #[error(transparent)]
    Warden(#[from] repo_warden_core::WardenError),

    /// A configuration validation failure.
    #[error(transparent)]
    Validation(#[from] config_manager::ValidationError),
}
