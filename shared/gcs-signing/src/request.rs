use chrono::{DateTime, Utc};
use http::{HeaderMap, Method};

/// Everything needed to sign one operation on one object
#[derive(Debug, Clone)]
pub struct SigningRequest<'a> {
    /// Bucket holding the object
    pub bucket: &'a str,
    /// Object name within the bucket
    pub object: &'a str,
    /// HTTP verb the URL is valid for
    pub method: Method,
    /// Moment the URL becomes usable
    pub issued_at: DateTime<Utc>,
    /// Moment the URL stops being usable
    pub expires_at: DateTime<Utc>,
    /// `Content-Type` the bearer must send, if any
    pub content_type: Option<&'a str>,
    /// Additional headers the bearer must send with exactly these values
    pub headers: HeaderMap,
}

impl<'a> SigningRequest<'a> {
    /// Creates a request for `method` on `bucket/object` without header constraints
    #[must_use]
    pub fn new(
        bucket: &'a str,
        object: &'a str,
        method: Method,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            bucket,
            object,
            method,
            issued_at,
            expires_at,
            content_type: None,
            headers: HeaderMap::new(),
        }
    }

    /// Requires the bearer to send `content_type`
    #[must_use]
    pub fn with_content_type(mut self, content_type: &'a str) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Requires the bearer to send `headers`
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Lifetime of the signed URL in whole seconds
    #[must_use]
    pub fn lifetime_secs(&self) -> i64 {
        (self.expires_at - self.issued_at).num_seconds()
    }
}
