//! Error types for URL issuance

use gcs_signing::SigningError;
use thiserror::Error;

use crate::object_name::DerivationError;
use crate::restrictions::RestrictionError;

/// Result type for URL issuance
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Errors that can occur while issuing a signed URL
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// The file was rejected by the upload restrictions; nothing was signed
    #[error(transparent)]
    Validation(#[from] RestrictionError),

    /// No service account was loaded, so there is no key to sign with
    #[error(
        "service account not loaded - configure GCS_SERVICE_ACCOUNT_JSON or GOOGLE_APPLICATION_CREDENTIALS"
    )]
    CredentialMissing,

    /// The signing provider failed
    #[error("failed to generate signed URL: {0}")]
    Signing(#[from] SigningError),

    /// The random source for unique object names failed
    #[error("failed to generate unique object name: {0}")]
    Derivation(#[from] DerivationError),
}

impl GeneratorError {
    /// Whether this is an expected, user-facing rejection rather than an operational failure
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
