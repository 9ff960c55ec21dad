//! Per-call overrides for upload URLs

use std::time::Duration;

/// How the storage key of an upload is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObjectNaming {
    /// Tag the file name with a random prefix, keeping the directory structure
    #[default]
    Unique,
    /// Use the caller's path as the storage key unchanged
    Verbatim,
}

/// Per-call overrides for an upload URL
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Bucket to upload into instead of the generator's default
    pub bucket: Option<String>,
    /// URL lifetime instead of the generator's default
    pub expiry: Option<Duration>,
    /// Storage key strategy
    pub naming: ObjectNaming,
}

impl UploadOptions {
    /// Options that change nothing
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads into `bucket`; an empty name keeps the default bucket
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into()).filter(|bucket: &String| !bucket.is_empty());
        self
    }

    /// Signs the URL for `expiry`; a zero duration keeps the default lifetime
    #[must_use]
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = Some(expiry).filter(|expiry| !expiry.is_zero());
        self
    }

    /// Sets the storage key strategy
    #[must_use]
    pub const fn with_naming(mut self, naming: ObjectNaming) -> Self {
        self.naming = naming;
        self
    }
}
