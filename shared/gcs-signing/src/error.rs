//! Error types for URL signing

use thiserror::Error;

/// Result type for signing operations
pub type SigningResult<T> = Result<T, SigningError>;

/// Errors that can occur while signing a URL
#[derive(Error, Debug)]
pub enum SigningError {
    /// The service account private key is not a usable RSA PEM key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// The requested lifetime is outside what the storage service accepts
    #[error("Invalid expiry: requested {requested}s, allowed 1..={max}s")]
    InvalidExpiry {
        /// Requested lifetime in seconds
        requested: i64,
        /// Longest accepted lifetime in seconds
        max: i64,
    },

    /// The bucket or object name is not valid for the storage service
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    /// A header value cannot be part of a canonical request
    #[error("Invalid header value for {0}")]
    InvalidHeader(String),

    /// The signature computation itself failed
    #[error("Signature computation failed: {0}")]
    Signature(String),
}
