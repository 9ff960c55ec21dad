//! Error types for upload restrictions

use thiserror::Error;

/// Result type for restriction checks
pub type RestrictionResult<T> = Result<T, RestrictionError>;

/// Errors raised when a file does not meet the upload restrictions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RestrictionError {
    /// The file extension is not in the allow-list
    #[error("file extension {extension:?} not allowed. Allowed extensions: {}", allowed.join(", "))]
    ExtensionNotAllowed {
        /// Lowercased extension of the rejected file, empty if it has none
        extension: String,
        /// Extensions the policy accepts
        allowed: Vec<String>,
    },
}
