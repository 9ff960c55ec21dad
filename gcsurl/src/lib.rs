//! Signed URL generation for Google Cloud Storage
//!
//! Issues short-lived URLs that let a bearer upload or download exactly one object
//! without holding credentials. Uploads get collision-resistant object names and are
//! checked against configurable restrictions before they are signed.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Layered configuration resolution
pub mod config;

/// Content type lookup
pub mod content_type;

/// Unique object names
pub mod object_name;

/// Upload restrictions
pub mod restrictions;

/// Shared types
pub mod types;

/// Signed URL issuance
pub mod url_generator;

pub use config::{Config, ConfigError, ConfigResult, GeneratorConfig, SigningIdentity};
pub use gcs_signing::{ServiceAccount, SigningError, SigningRequest, UrlSigner, V4Signer};
pub use restrictions::{RestrictionError, UploadRestrictions};
pub use types::{EnvSource, GeneratorError, GeneratorResult, ProcessEnv};
pub use url_generator::{ObjectNaming, UploadOptions, UploadResult, UrlGenerator};
