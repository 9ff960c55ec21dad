//! Upload restrictions
//!
//! Only the extension allow-list is checked here. The size cap is turned into a
//! `Content-Length` constraint on the signed URL and enforced by the storage service at
//! upload time. `allow_multiple` is carried for callers that gate multi-file uploads
//! themselves and is never enforced by this crate.

mod error;

use serde::{Deserialize, Serialize, Serializer};

pub use error::{RestrictionError, RestrictionResult};

use crate::object_name::{extension, normalize_extension};
use crate::types::environment::{
    parse_flag, parse_positive, EnvSource, GCS_ALLOWED_FILE_EXTENSIONS,
    GCS_ALLOW_MULTIPLE_UPLOADS, GCS_MAX_FILE_SIZE_MB,
};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Validation rules applied to uploads
///
/// Serializes with an extra read-only `maxFileSizeBytes` field derived from the MB cap.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadRestrictions {
    /// Whether callers may upload several files; informational only
    pub allow_multiple: bool,
    /// Accepted extensions such as `.pdf`; empty accepts everything
    pub allowed_extensions: Vec<String>,
    /// Upload size cap in MB
    #[serde(rename = "maxFileSizeMB")]
    pub max_file_size_mb: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RestrictionsOutput<'a> {
    allow_multiple: bool,
    allowed_extensions: &'a [String],
    #[serde(rename = "maxFileSizeMB")]
    max_file_size_mb: Option<u64>,
    max_file_size_bytes: Option<u64>,
}

impl Serialize for UploadRestrictions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RestrictionsOutput {
            allow_multiple: self.allow_multiple,
            allowed_extensions: &self.allowed_extensions,
            max_file_size_mb: self.max_file_size_mb,
            max_file_size_bytes: self.max_file_size_bytes(),
        }
        .serialize(serializer)
    }
}

impl Default for UploadRestrictions {
    fn default() -> Self {
        Self {
            allow_multiple: true,
            allowed_extensions: Vec::new(),
            max_file_size_mb: None,
        }
    }
}

impl UploadRestrictions {
    /// Permissive restrictions: multiple uploads allowed, any extension, no size cap
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the multiple-upload flag
    #[must_use]
    pub fn with_allow_multiple(mut self, allow_multiple: bool) -> Self {
        self.allow_multiple = allow_multiple;
        self
    }

    /// Sets the allowed extensions, normalizing each to a lowercase `.ext` form
    #[must_use]
    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = extensions
            .into_iter()
            .filter_map(|extension| normalize_extension(extension.as_ref()))
            .collect();
        self
    }

    /// Caps uploads at `max_file_size_mb` MB; `0` removes the cap
    #[must_use]
    pub fn with_max_file_size_mb(mut self, max_file_size_mb: u64) -> Self {
        self.max_file_size_mb = if max_file_size_mb > 0 {
            Some(max_file_size_mb)
        } else {
            None
        };
        self
    }

    /// Size cap in bytes, derived from the MB setting
    #[must_use]
    pub fn max_file_size_bytes(&self) -> Option<u64> {
        self.max_file_size_mb
            .filter(|mb| *mb > 0)
            .map(|mb| mb.saturating_mul(BYTES_PER_MB))
    }

    /// The allow-list in lowercase `.ext` form, without blank entries
    fn normalized_extensions(&self) -> Vec<String> {
        self.allowed_extensions
            .iter()
            .filter_map(|allowed| normalize_extension(allowed))
            .collect()
    }

    /// Whether any rule is set, in which case uploads are validated and signed with
    /// content-type and size constraints
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.normalized_extensions().is_empty()
            || self.max_file_size_bytes().is_some()
            || !self.allow_multiple
    }

    /// Checks `filename` against the extension allow-list (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns `RestrictionError::ExtensionNotAllowed` if the allow-list is non-empty and
    /// does not contain the file's extension
    pub fn validate(&self, filename: &str) -> RestrictionResult<()> {
        let allowed = self.normalized_extensions();
        if allowed.is_empty() {
            return Ok(());
        }

        let extension = extension(filename).to_lowercase();
        if allowed.contains(&extension) {
            Ok(())
        } else {
            Err(RestrictionError::ExtensionNotAllowed { extension, allowed })
        }
    }

    /// Builds restrictions from `GCS_ALLOW_MULTIPLE_UPLOADS`, `GCS_ALLOWED_FILE_EXTENSIONS`
    /// and `GCS_MAX_FILE_SIZE_MB`.
    ///
    /// Returns `None` when none of the three variables is set, which is different from a
    /// permissive policy: callers fall back to their own default in that case.
    #[must_use]
    pub fn from_env<E: EnvSource + ?Sized>(env: &E) -> Option<Self> {
        let allow_multiple = env.var(GCS_ALLOW_MULTIPLE_UPLOADS);
        let allowed_extensions = env.var(GCS_ALLOWED_FILE_EXTENSIONS);
        let max_file_size_mb = env.var(GCS_MAX_FILE_SIZE_MB);

        if allow_multiple.is_none() && allowed_extensions.is_none() && max_file_size_mb.is_none()
        {
            return None;
        }

        let restrictions = Self::new()
            .with_allow_multiple(parse_flag(allow_multiple.as_deref(), true))
            .with_allowed_extensions(allowed_extensions.as_deref().unwrap_or_default().split(','))
            .with_max_file_size_mb(parse_positive(max_file_size_mb.as_deref()).unwrap_or(0));

        Some(restrictions)
    }
}
