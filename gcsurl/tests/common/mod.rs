// Not every utils is used in every test, so we allow dead code
#![allow(unused_imports, dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use gcsurl::{
    GeneratorConfig, ServiceAccount, SigningError, SigningIdentity, SigningRequest,
    UploadRestrictions, UrlGenerator, UrlSigner,
};
use http::Method;

pub const TEST_BUCKET: &str = "docs";
pub const TEST_CLIENT_EMAIL: &str = "signer@gcsurl-test.iam.gserviceaccount.com";
pub const SERVICE_ACCOUNT_JSON: &str =
    include_str!("../../../shared/gcs-signing/tests/fixtures/service_account.json");

pub fn test_account() -> ServiceAccount {
    serde_json::from_str(SERVICE_ACCOUNT_JSON).expect("fixture must be a valid service account")
}

pub fn env_map(vars: &[(&str, &str)]) -> HashMap<String, String> {
    vars.iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

/// A signing call as seen by the signer
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub bucket: String,
    pub object: String,
    pub method: Method,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
    pub client_email: String,
}

/// Records every request and returns a fake URL
#[derive(Debug, Default)]
pub struct RecordingSigner {
    requests: Mutex<Vec<RecordedRequest>>,
}

impl RecordingSigner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("signer should have been called")
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl UrlSigner for RecordingSigner {
    fn sign_url(
        &self,
        request: &SigningRequest<'_>,
        account: &ServiceAccount,
    ) -> Result<String, SigningError> {
        let recorded = RecordedRequest {
            bucket: request.bucket.to_string(),
            object: request.object.to_string(),
            method: request.method.clone(),
            issued_at: request.issued_at,
            expires_at: request.expires_at,
            content_type: request.content_type.map(str::to_string),
            headers: request
                .headers
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        value.to_str().unwrap().to_string(),
                    )
                })
                .collect(),
            client_email: account.client_email.clone(),
        };
        self.requests.lock().unwrap().push(recorded);

        Ok(format!(
            "https://signed.example/{}/{}?method={}",
            request.bucket, request.object, request.method
        ))
    }
}

/// Fails every request
#[derive(Debug, Default)]
pub struct FailingSigner;

impl UrlSigner for FailingSigner {
    fn sign_url(
        &self,
        _request: &SigningRequest<'_>,
        _account: &ServiceAccount,
    ) -> Result<String, SigningError> {
        Err(SigningError::Signature("signing backend unavailable".to_string()))
    }
}

/// A generator for [`TEST_BUCKET`] holding the fixture service account
pub fn generator_config(restrictions: UploadRestrictions) -> GeneratorConfig {
    GeneratorConfig::new(TEST_BUCKET)
        .unwrap()
        .with_signing_identity(SigningIdentity::ServiceAccount(test_account()))
        .with_restrictions(restrictions)
}

pub fn recording_generator(
    restrictions: UploadRestrictions,
) -> (UrlGenerator, Arc<RecordingSigner>) {
    let signer = RecordingSigner::new();
    let generator = UrlGenerator::from_generator_config(generator_config(restrictions))
        .with_signer(signer.clone());
    (generator, signer)
}

pub fn pdf_only() -> UploadRestrictions {
    UploadRestrictions::new().with_allowed_extensions([".pdf"])
}
