//! Configuration resolution
//!
//! Every setting is resolved once, when a generator is built, from up to four sources
//! in a fixed order: the explicit [`Config`] struct, a constructor argument, the
//! environment, and a built-in default. The result is an immutable [`GeneratorConfig`].
mod credentials;
mod error;

use std::path::PathBuf;
use std::time::Duration;

use gcs_signing::ServiceAccount;
use tracing::{debug, info};

pub use error::{ConfigError, ConfigResult};

use crate::restrictions::UploadRestrictions;
use crate::types::environment::{
    parse_positive, EnvSource, GCP_PROJECT_ID, GCS_BUCKET_NAME, GCS_DEFAULT_EXPIRY_MINUTES,
};

/// Signed URL lifetime used when no source sets one
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(15 * 60);

/// Settings supplied explicitly by the caller; every field is optional
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// GCP project ID, informational only
    pub project_id: Option<String>,
    /// Default bucket, takes precedence over every other source
    pub bucket_name: Option<String>,
    /// Service account key file, used when `GCS_SERVICE_ACCOUNT_JSON` is unset
    pub service_account_key_path: Option<PathBuf>,
    /// Default URL lifetime in minutes; `0` counts as not given
    pub default_expiry_minutes: Option<u64>,
    /// Upload restrictions, replacing any set through the environment
    pub upload_restrictions: Option<UploadRestrictions>,
}

/// Identity used to sign URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningIdentity {
    /// Sign locally with a service account key
    ServiceAccount(ServiceAccount),
    /// No key was configured; defer to the platform's default credentials
    Ambient,
}

impl SigningIdentity {
    /// The service account, if one was loaded
    #[must_use]
    pub const fn service_account(&self) -> Option<&ServiceAccount> {
        match self {
            Self::ServiceAccount(account) => Some(account),
            Self::Ambient => None,
        }
    }
}

/// Fully resolved, immutable generator settings
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    bucket_name: String,
    project_id: Option<String>,
    signing_identity: SigningIdentity,
    default_expiry: Duration,
    restrictions: UploadRestrictions,
}

impl GeneratorConfig {
    /// Creates a config for `bucket` with ambient credentials, the default expiry and
    /// no upload restrictions
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingBucket` if `bucket` is empty
    pub fn new(bucket: impl Into<String>) -> ConfigResult<Self> {
        let bucket_name = bucket.into();
        if bucket_name.is_empty() {
            return Err(ConfigError::MissingBucket);
        }

        Ok(Self {
            bucket_name,
            project_id: None,
            signing_identity: SigningIdentity::Ambient,
            default_expiry: DEFAULT_EXPIRY,
            restrictions: UploadRestrictions::default(),
        })
    }

    /// Resolves every setting from `config`, `bucket_arg` and `env`.
    ///
    /// For each setting the first source that provides a usable value wins:
    ///
    /// * bucket: `config.bucket_name`, `bucket_arg`, `GCS_BUCKET_NAME`
    /// * project: `config.project_id`, `GCP_PROJECT_ID`
    /// * expiry: `config.default_expiry_minutes`, `GCS_DEFAULT_EXPIRY_MINUTES`, 15 minutes
    /// * restrictions: `config.upload_restrictions`, the `GCS_*` restriction variables,
    ///   permissive
    /// * credentials: `GCS_SERVICE_ACCOUNT_JSON`, `config.service_account_key_path`,
    ///   `GOOGLE_APPLICATION_CREDENTIALS`, ambient
    ///
    /// Unusable expiry values are skipped silently.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingBucket` if no source names a bucket, or a credential
    /// error if the selected credential source cannot be read or parsed
    pub fn resolve<E: EnvSource + ?Sized>(
        config: &Config,
        bucket_arg: Option<&str>,
        env: &E,
    ) -> ConfigResult<Self> {
        let bucket_name = non_empty(config.bucket_name.as_deref())
            .or_else(|| non_empty(bucket_arg))
            .map(str::to_string)
            .or_else(|| env.var(GCS_BUCKET_NAME))
            .ok_or(ConfigError::MissingBucket)?;

        let project_id = non_empty(config.project_id.as_deref())
            .map(str::to_string)
            .or_else(|| env.var(GCP_PROJECT_ID));

        let default_expiry_minutes = config
            .default_expiry_minutes
            .filter(|minutes| *minutes > 0)
            .or_else(|| parse_positive(env.var(GCS_DEFAULT_EXPIRY_MINUTES).as_deref()));

        let restrictions = config
            .upload_restrictions
            .clone()
            .or_else(|| UploadRestrictions::from_env(env))
            .unwrap_or_default();

        let signing_identity = credentials::resolve_signing_identity(
            config.service_account_key_path.as_deref(),
            env,
        )?;

        let mut resolved = Self::new(bucket_name)?
            .with_signing_identity(signing_identity)
            .with_restrictions(restrictions);
        resolved.project_id = project_id;
        if let Some(minutes) = default_expiry_minutes {
            resolved = resolved.with_default_expiry(minutes_to_duration(minutes));
        }

        info!(
            bucket = %resolved.bucket_name,
            project_id = resolved.project_id.as_deref().unwrap_or_default(),
            expiry_minutes = resolved.default_expiry_minutes(),
            restricted = resolved.restrictions.is_active(),
            service_account = resolved.signing_identity.service_account().is_some(),
            "resolved generator configuration"
        );

        Ok(resolved)
    }

    /// Sets the informational project ID
    #[must_use]
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Sets the identity URLs are signed with
    #[must_use]
    pub fn with_signing_identity(mut self, signing_identity: SigningIdentity) -> Self {
        self.signing_identity = signing_identity;
        self
    }

    /// Sets the default URL lifetime; a zero duration is ignored
    #[must_use]
    pub fn with_default_expiry(mut self, expiry: Duration) -> Self {
        if expiry.is_zero() {
            debug!("ignoring zero default expiry");
        } else {
            self.default_expiry = expiry;
        }
        self
    }

    /// Sets the upload restrictions
    #[must_use]
    pub fn with_restrictions(mut self, restrictions: UploadRestrictions) -> Self {
        self.restrictions = restrictions;
        self
    }

    /// Default bucket, never empty
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Informational project ID
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Identity URLs are signed with
    #[must_use]
    pub const fn signing_identity(&self) -> &SigningIdentity {
        &self.signing_identity
    }

    /// Default URL lifetime
    #[must_use]
    pub const fn default_expiry(&self) -> Duration {
        self.default_expiry
    }

    /// Default URL lifetime in whole minutes
    #[must_use]
    pub const fn default_expiry_minutes(&self) -> u64 {
        self.default_expiry.as_secs() / 60
    }

    /// Upload restrictions
    #[must_use]
    pub const fn restrictions(&self) -> &UploadRestrictions {
        &self.restrictions
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

const fn minutes_to_duration(minutes: u64) -> Duration {
    Duration::from_secs(minutes.saturating_mul(60))
}
