//! GCS V4 signing backed by `tame-gcs`
//!
//! Canonicalization, the string-to-sign and the RSA-SHA256 signature are computed by
//! [`tame_gcs::signed_url::UrlSigner`] with its `ring` backend. This module only maps a
//! [`SigningRequest`] onto its inputs and the service account onto a key provider.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::{header::CONTENT_TYPE, HeaderValue};
use tame_gcs::{
    signed_url::{self, SignedUrlOptional},
    signing::{Key, KeyProvider},
    BucketName, ObjectName,
};
use tracing::debug;

use crate::{ServiceAccount, SigningError, SigningRequest, SigningResult, UrlSigner};

/// Longest lifetime the storage service accepts for a V4 URL (7 days)
const MAX_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;

const PKCS8_LABEL: &str = "PRIVATE KEY";
const PKCS1_LABEL: &str = "RSA PRIVATE KEY";

/// Signs URLs with the V4 process using the service account's RSA key
#[derive(Debug, Clone, Copy, Default)]
pub struct V4Signer;

impl V4Signer {
    /// Creates a signer for `storage.googleapis.com`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl UrlSigner for V4Signer {
    fn sign_url(
        &self,
        request: &SigningRequest<'_>,
        account: &ServiceAccount,
    ) -> SigningResult<String> {
        let lifetime = request.lifetime_secs();
        if !(1..=MAX_EXPIRY_SECS).contains(&lifetime) {
            return Err(SigningError::InvalidExpiry {
                requested: lifetime,
                max: MAX_EXPIRY_SECS,
            });
        }

        let key = AccountKey::from_account(account)?;

        let bucket = BucketName::try_from(request.bucket)
            .map_err(|e| SigningError::InvalidResource(e.to_string()))?;
        let object = ObjectName::try_from(request.object)
            .map_err(|e| SigningError::InvalidResource(e.to_string()))?;

        let mut headers = request.headers.clone();
        if let Some(content_type) = request.content_type {
            let value = HeaderValue::from_str(content_type)
                .map_err(|_| SigningError::InvalidHeader(CONTENT_TYPE.as_str().to_string()))?;
            headers.insert(CONTENT_TYPE, value);
        }

        let optional = SignedUrlOptional {
            method: request.method.clone(),
            duration: std::time::Duration::from_secs(lifetime.unsigned_abs()),
            headers,
            ..SignedUrlOptional::default()
        };

        let url = signed_url::UrlSigner::with_ring()
            .generate(&key, &(&bucket, &object), optional)
            .map_err(|e| SigningError::Signature(e.to_string()))?;

        debug!(
            bucket = request.bucket,
            object = request.object,
            method = %request.method,
            expires_in = lifetime,
            "Signed V4 URL"
        );

        Ok(url.to_string())
    }
}

/// DER key material plus the account email, as `tame-gcs` expects them
struct AccountKey<'a> {
    der: Vec<u8>,
    pkcs8: bool,
    client_email: &'a str,
}

impl<'a> AccountKey<'a> {
    fn from_account(account: &'a ServiceAccount) -> SigningResult<Self> {
        let (label, der) = decode_pem(&account.private_key)?;
        let pkcs8 = match label {
            PKCS8_LABEL => true,
            PKCS1_LABEL => false,
            other => {
                return Err(SigningError::InvalidPrivateKey(format!(
                    "unsupported PEM block {other:?}"
                )))
            }
        };

        Ok(Self {
            der,
            pkcs8,
            client_email: &account.client_email,
        })
    }
}

impl KeyProvider for AccountKey<'_> {
    fn key(&self) -> Key<'_> {
        if self.pkcs8 {
            Key::Pkcs8(&self.der)
        } else {
            Key::Der(&self.der)
        }
    }

    fn authorizer(&self) -> &str {
        self.client_email
    }
}

/// Splits a single PEM block into its label and decoded body
fn decode_pem(pem: &str) -> SigningResult<(&str, Vec<u8>)> {
    let invalid = |reason: &str| SigningError::InvalidPrivateKey(reason.to_string());

    let mut lines = pem.lines().map(str::trim).filter(|line| !line.is_empty());
    let label = lines
        .next()
        .and_then(|line| line.strip_prefix("-----BEGIN "))
        .and_then(|line| line.strip_suffix("-----"))
        .ok_or_else(|| invalid("missing PEM header"))?;

    let footer = format!("-----END {label}-----");
    let mut body = String::new();
    let mut terminated = false;
    for line in lines {
        if line == footer {
            terminated = true;
            break;
        }
        body.push_str(line);
    }
    if !terminated {
        return Err(invalid("missing PEM footer"));
    }

    let der = STANDARD
        .decode(body)
        .map_err(|e| SigningError::InvalidPrivateKey(e.to_string()))?;

    Ok((label, der))
}
