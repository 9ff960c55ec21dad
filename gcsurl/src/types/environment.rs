//! Environment lookup for configuration resolution
//!
//! Resolution never reads the process environment directly; it goes through an
//! [`EnvSource`], so the same rules can run against an in-memory map.

use std::collections::HashMap;
use std::env;

/// Default bucket name
pub const GCS_BUCKET_NAME: &str = "GCS_BUCKET_NAME";
/// Service account JSON document, highest-precedence credential source
pub const GCS_SERVICE_ACCOUNT_JSON: &str = "GCS_SERVICE_ACCOUNT_JSON";
/// Path to a service account JSON key file
pub const GOOGLE_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";
/// GCP project ID, informational only
pub const GCP_PROJECT_ID: &str = "GCP_PROJECT_ID";
/// Default signed URL lifetime in minutes
pub const GCS_DEFAULT_EXPIRY_MINUTES: &str = "GCS_DEFAULT_EXPIRY_MINUTES";
/// Whether callers may upload several files (`true`/`false`)
pub const GCS_ALLOW_MULTIPLE_UPLOADS: &str = "GCS_ALLOW_MULTIPLE_UPLOADS";
/// Comma-separated list of allowed file extensions
pub const GCS_ALLOWED_FILE_EXTENSIONS: &str = "GCS_ALLOWED_FILE_EXTENSIONS";
/// Maximum upload size in MB
pub const GCS_MAX_FILE_SIZE_MB: &str = "GCS_MAX_FILE_SIZE_MB";

/// A source of configuration variables
pub trait EnvSource {
    /// Returns the value of `key`, or `None` when it is unset or empty
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads variables from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|value| !value.is_empty())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|value| !value.is_empty()).cloned()
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

/// Parses a strictly positive integer, yielding `None` for anything else.
///
/// Bad numeric settings are ignored rather than rejected so the next source (or the
/// built-in default) applies.
#[must_use]
pub fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw?.trim().parse::<u64>().ok().filter(|value| *value > 0)
}

/// Parses a case-insensitive `true`; any other value is `false`, unset is `default`
#[must_use]
pub fn parse_flag(raw: Option<&str>, default: bool) -> bool {
    raw.map_or(default, |value| value.trim().eq_ignore_ascii_case("true"))
}
