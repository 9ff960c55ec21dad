//! Signed URL issuance
//!
//! [`UrlGenerator`] turns a caller path into a signed upload or download URL. Uploads
//! run through object naming and the upload restrictions before anything is signed; a
//! rejected file never reaches the signer.
mod options;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use gcs_signing::{SigningRequest, UrlSigner, V4Signer};
use http::{header::CONTENT_LENGTH, HeaderMap, HeaderValue, Method};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub use options::{ObjectNaming, UploadOptions};

use crate::config::{Config, ConfigResult, GeneratorConfig};
use crate::content_type::{content_type_for_path, DEFAULT_CONTENT_TYPE};
use crate::object_name::unique_object_name;
use crate::restrictions::{RestrictionResult, UploadRestrictions};
use crate::types::{EnvSource, GeneratorError, GeneratorResult, ProcessEnv};

/// A signed upload URL and the object it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// URL the bearer can `PUT` the file to
    #[serde(rename = "uploadUrl")]
    pub url: String,
    /// Moment the URL stops working
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
    /// Object name the file will be stored under; callers must persist it
    #[serde(rename = "generatedKey")]
    pub storage_key: String,
    /// Path the caller asked for
    #[serde(rename = "originalName")]
    pub original_name: String,
}

/// Issues signed URLs for one default bucket
///
/// Holds only immutable state, so it can be shared freely behind an `Arc`.
#[derive(Clone)]
pub struct UrlGenerator {
    config: GeneratorConfig,
    signer: Arc<dyn UrlSigner>,
}

impl fmt::Debug for UrlGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UrlGenerator {
    /// Creates a generator configured entirely from the process environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingBucket` if `GCS_BUCKET_NAME` is unset, or a
    /// credential error if the configured service account cannot be loaded
    pub fn new() -> ConfigResult<Self> {
        Self::from_sources(&Config::default(), None, &ProcessEnv)
    }

    /// Creates a generator for `bucket`, falling back to `GCS_BUCKET_NAME` when it is
    /// empty
    ///
    /// # Errors
    ///
    /// See [`UrlGenerator::new`]
    pub fn with_bucket(bucket: &str) -> ConfigResult<Self> {
        Self::from_sources(&Config::default(), Some(bucket), &ProcessEnv)
    }

    /// Creates a generator from the environment with explicit upload restrictions
    ///
    /// # Errors
    ///
    /// See [`UrlGenerator::new`]
    pub fn with_restrictions(restrictions: UploadRestrictions) -> ConfigResult<Self> {
        let config = Config {
            upload_restrictions: Some(restrictions),
            ..Config::default()
        };
        Self::from_sources(&config, None, &ProcessEnv)
    }

    /// Creates a generator for `bucket` with explicit upload restrictions
    ///
    /// # Errors
    ///
    /// See [`UrlGenerator::new`]
    pub fn with_bucket_and_restrictions(
        bucket: &str,
        restrictions: UploadRestrictions,
    ) -> ConfigResult<Self> {
        let config = Config {
            upload_restrictions: Some(restrictions),
            ..Config::default()
        };
        Self::from_sources(&config, Some(bucket), &ProcessEnv)
    }

    /// Creates a generator from an explicit config, filling gaps from the environment
    ///
    /// # Errors
    ///
    /// See [`UrlGenerator::new`]
    pub fn with_config(config: &Config) -> ConfigResult<Self> {
        Self::from_sources(config, None, &ProcessEnv)
    }

    /// Creates a generator from an explicit config, a bucket argument and any
    /// environment source
    ///
    /// # Errors
    ///
    /// See [`GeneratorConfig::resolve`]
    pub fn from_sources<E: EnvSource + ?Sized>(
        config: &Config,
        bucket_arg: Option<&str>,
        env: &E,
    ) -> ConfigResult<Self> {
        GeneratorConfig::resolve(config, bucket_arg, env).map(Self::from_generator_config)
    }

    /// Creates a generator from already resolved settings, signing with [`V4Signer`]
    #[must_use]
    pub fn from_generator_config(config: GeneratorConfig) -> Self {
        debug!(bucket = %config.bucket_name(), "URL generator ready");
        Self {
            config,
            signer: Arc::new(V4Signer::new()),
        }
    }

    /// Replaces the signing provider
    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn UrlSigner>) -> Self {
        self.signer = signer;
        self
    }

    /// Issues an upload URL for a unique object derived from `path` in the default
    /// bucket
    ///
    /// # Errors
    ///
    /// * `GeneratorError::Validation` if the upload restrictions reject `path`
    /// * `GeneratorError::CredentialMissing` if no service account is loaded
    /// * `GeneratorError::Signing` if the signer fails
    /// * `GeneratorError::Derivation` if no random name tag can be drawn
    pub fn issue_upload_url(&self, path: &str) -> GeneratorResult<UploadResult> {
        self.issue_upload_url_with_options(path, &UploadOptions::default())
    }

    /// Like [`UrlGenerator::issue_upload_url`], uploading into `bucket`
    ///
    /// # Errors
    ///
    /// See [`UrlGenerator::issue_upload_url`]
    pub fn issue_upload_url_with_bucket(
        &self,
        bucket: &str,
        path: &str,
    ) -> GeneratorResult<UploadResult> {
        self.issue_upload_url_with_options(path, &UploadOptions::new().with_bucket(bucket))
    }

    /// Like [`UrlGenerator::issue_upload_url`], storing the object under `path` as is
    ///
    /// # Errors
    ///
    /// See [`UrlGenerator::issue_upload_url`]
    pub fn issue_upload_url_with_original_name(
        &self,
        path: &str,
    ) -> GeneratorResult<UploadResult> {
        self.issue_upload_url_with_options(
            path,
            &UploadOptions::new().with_naming(ObjectNaming::Verbatim),
        )
    }

    /// Issues an upload URL for `path` with per-call overrides
    ///
    /// The restrictions are checked against `path` before signing. When they are
    /// active, the URL also pins the `Content-Type` derived from the storage key and,
    /// with a size cap, a `Content-Length` equal to the cap in bytes. Otherwise the URL
    /// pins `application/octet-stream` only.
    ///
    /// # Errors
    ///
    /// See [`UrlGenerator::issue_upload_url`]
    #[instrument(level = "debug", skip(self))]
    pub fn issue_upload_url_with_options(
        &self,
        path: &str,
        options: &UploadOptions,
    ) -> GeneratorResult<UploadResult> {
        let storage_key = match options.naming {
            ObjectNaming::Unique => unique_object_name(path)?,
            ObjectNaming::Verbatim => path.to_string(),
        };

        let restrictions = self.config.restrictions();
        let mut headers = HeaderMap::new();
        let content_type = if restrictions.is_active() {
            restrictions.validate(path)?;
            if let Some(max_bytes) = restrictions.max_file_size_bytes() {
                headers.insert(CONTENT_LENGTH, HeaderValue::from(max_bytes));
            }
            content_type_for_path(&storage_key)
        } else {
            DEFAULT_CONTENT_TYPE
        };

        let bucket = self.bucket_or_default(options.bucket.as_deref());
        let issued_at = Utc::now();
        let expires_at = expiry_instant(issued_at, self.expiry_or_default(options.expiry));
        let request = SigningRequest::new(bucket, &storage_key, Method::PUT, issued_at, expires_at)
            .with_content_type(content_type)
            .with_headers(headers);

        let url = self.sign(&request)?;
        debug!(bucket, %storage_key, content_type, %expires_at, "issued upload URL");

        Ok(UploadResult {
            url,
            expires_at,
            storage_key,
            original_name: path.to_string(),
        })
    }

    /// Issues a download URL for `path` in the default bucket
    ///
    /// # Errors
    ///
    /// * `GeneratorError::CredentialMissing` if no service account is loaded
    /// * `GeneratorError::Signing` if the signer fails
    pub fn issue_download_url(&self, path: &str) -> GeneratorResult<String> {
        self.issue_download_url_with_expiry(self.config.bucket_name(), path, Duration::ZERO)
    }

    /// Issues a download URL for `path` in `bucket`
    ///
    /// # Errors
    ///
    /// See [`UrlGenerator::issue_download_url`]
    pub fn issue_download_url_with_bucket(
        &self,
        bucket: &str,
        path: &str,
    ) -> GeneratorResult<String> {
        self.issue_download_url_with_expiry(bucket, path, Duration::ZERO)
    }

    /// Issues a download URL for `path` in `bucket` valid for `expiry`
    ///
    /// An empty `bucket` selects the default bucket and a zero `expiry` the default
    /// lifetime. Upload restrictions do not apply to downloads.
    ///
    /// # Errors
    ///
    /// See [`UrlGenerator::issue_download_url`]
    #[instrument(level = "debug", skip(self))]
    pub fn issue_download_url_with_expiry(
        &self,
        bucket: &str,
        path: &str,
        expiry: Duration,
    ) -> GeneratorResult<String> {
        let bucket = self.bucket_or_default(Some(bucket));
        let issued_at = Utc::now();
        let expires_at = expiry_instant(issued_at, self.expiry_or_default(Some(expiry)));
        let request = SigningRequest::new(bucket, path, Method::GET, issued_at, expires_at);

        let url = self.sign(&request)?;
        debug!(bucket, path, %expires_at, "issued download URL");

        Ok(url)
    }

    /// Checks `filename` against the upload restrictions without signing anything
    ///
    /// # Errors
    ///
    /// Returns `RestrictionError::ExtensionNotAllowed` if the extension is not allowed
    pub fn validate_upload(&self, filename: &str) -> RestrictionResult<()> {
        self.config.restrictions().validate(filename)
    }

    /// Default bucket
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        self.config.bucket_name()
    }

    /// Informational project ID
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.config.project_id()
    }

    /// Default URL lifetime
    #[must_use]
    pub const fn default_expiry(&self) -> Duration {
        self.config.default_expiry()
    }

    /// Default URL lifetime in whole minutes
    #[must_use]
    pub const fn default_expiry_minutes(&self) -> u64 {
        self.config.default_expiry_minutes()
    }

    /// Upload restrictions applied to every upload URL
    #[must_use]
    pub const fn upload_restrictions(&self) -> &UploadRestrictions {
        self.config.restrictions()
    }

    /// Whether upload URLs are validated and constrained
    #[must_use]
    pub fn has_upload_restrictions(&self) -> bool {
        self.config.restrictions().is_active()
    }

    /// Whether a service account key is loaded; without one every issuance fails with
    /// `GeneratorError::CredentialMissing`
    #[must_use]
    pub const fn has_signing_credentials(&self) -> bool {
        self.config.signing_identity().service_account().is_some()
    }

    fn sign(&self, request: &SigningRequest<'_>) -> GeneratorResult<String> {
        let account = self
            .config
            .signing_identity()
            .service_account()
            .ok_or(GeneratorError::CredentialMissing)?;

        Ok(self.signer.sign_url(request, account)?)
    }

    fn bucket_or_default<'a>(&'a self, bucket: Option<&'a str>) -> &'a str {
        bucket
            .filter(|bucket| !bucket.is_empty())
            .unwrap_or_else(|| self.config.bucket_name())
    }

    fn expiry_or_default(&self, expiry: Option<Duration>) -> Duration {
        expiry
            .filter(|expiry| !expiry.is_zero())
            .unwrap_or_else(|| self.config.default_expiry())
    }
}

/// `issued_at + expiry`, saturating at the latest representable instant
fn expiry_instant(issued_at: DateTime<Utc>, expiry: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(expiry)
        .ok()
        .and_then(|expiry| issued_at.checked_add_signed(expiry))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
