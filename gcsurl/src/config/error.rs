//! Error types for configuration resolution

use std::path::PathBuf;

use thiserror::Error;

/// Result type for configuration resolution
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that prevent a URL generator from being constructed
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No source provided a bucket name
    #[error(
        "bucket name is required. Provide it explicitly or via the GCS_BUCKET_NAME environment variable"
    )]
    MissingBucket,

    /// The service account JSON in the environment could not be parsed
    #[error("failed to parse GCS_SERVICE_ACCOUNT_JSON: {0}")]
    InvalidServiceAccountJson(#[source] serde_json::Error),

    /// The service account key file could not be read
    #[error("failed to read service account file {}: {source}", path.display())]
    CredentialFileRead {
        /// Path of the key file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The service account key file is not valid service account JSON
    #[error("failed to parse service account file {}: {source}", path.display())]
    CredentialFileParse {
        /// Path of the key file
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },
}
