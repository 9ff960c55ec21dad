//! URL signing for Google Cloud Storage
//!
//! This crate defines the seam between request shaping and the actual signature
//! computation. [`UrlSigner`] takes a fully parameterized [`SigningRequest`] plus the
//! [`ServiceAccount`] to sign with and returns a signed URL. [`V4Signer`] produces GCS V4
//! (`GOOG4-RSA-SHA256`) URLs through `tame-gcs`, locally and with no network I/O.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

mod account;
mod error;
mod request;
mod v4;

pub use account::ServiceAccount;
pub use error::{SigningError, SigningResult};
pub use request::SigningRequest;
pub use v4::V4Signer;

/// Produces signed URLs for a single object operation.
///
/// Implementations must not retry and must surface every failure to the caller.
pub trait UrlSigner: Send + Sync {
    /// Signs `request` with the credentials of `account`
    ///
    /// # Errors
    ///
    /// Returns a [`SigningError`] when the key cannot be used, the request cannot be
    /// expressed as a signed URL, or the signature computation fails.
    fn sign_url(
        &self,
        request: &SigningRequest<'_>,
        account: &ServiceAccount,
    ) -> SigningResult<String>;
}
