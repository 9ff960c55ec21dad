mod common;

use std::time::Duration;

use common::*;
use gcsurl::{GeneratorConfig, GeneratorError, UrlGenerator};
use http::Method;

#[test]
fn test_download_url_ignores_restrictions() {
    let (generator, signer) = recording_generator(pdf_only());

    let url = generator.issue_download_url("photos/cat.jpg").unwrap();

    assert_eq!(url, "https://signed.example/docs/photos/cat.jpg?method=GET");
    let request = signer.last();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.bucket, TEST_BUCKET);
    assert_eq!(request.object, "photos/cat.jpg");
    assert_eq!(request.content_type, None);
    assert!(request.headers.is_empty());
    assert_eq!((request.expires_at - request.issued_at).num_minutes(), 15);
}

#[test]
fn test_download_url_with_bucket() {
    let (generator, signer) = recording_generator(pdf_only());

    generator
        .issue_download_url_with_bucket("archive", "2023/report.pdf")
        .unwrap();

    assert_eq!(signer.last().bucket, "archive");
}

#[test]
fn test_download_url_with_expiry() {
    let (generator, signer) = recording_generator(pdf_only());

    generator
        .issue_download_url_with_expiry("archive", "big.zip", Duration::from_secs(2 * 60 * 60))
        .unwrap();
    let request = signer.last();
    assert_eq!(request.bucket, "archive");
    assert_eq!((request.expires_at - request.issued_at).num_minutes(), 120);

    generator
        .issue_download_url_with_expiry("", "big.zip", Duration::ZERO)
        .unwrap();
    let request = signer.last();
    assert_eq!(request.bucket, TEST_BUCKET);
    assert_eq!((request.expires_at - request.issued_at).num_minutes(), 15);
}

#[test]
fn test_download_uses_configured_default_expiry() {
    let signer = RecordingSigner::new();
    let config = generator_config(pdf_only()).with_default_expiry(Duration::from_secs(5 * 60));
    let generator = UrlGenerator::from_generator_config(config).with_signer(signer.clone());

    generator.issue_download_url("a.pdf").unwrap();

    let request = signer.last();
    assert_eq!((request.expires_at - request.issued_at).num_minutes(), 5);
}

#[test]
fn test_download_without_service_account() {
    let signer = RecordingSigner::new();
    let generator =
        UrlGenerator::from_generator_config(GeneratorConfig::new(TEST_BUCKET).unwrap())
            .with_signer(signer.clone());

    assert!(matches!(
        generator.issue_download_url("a.pdf"),
        Err(GeneratorError::CredentialMissing)
    ));
    assert_eq!(signer.call_count(), 0);
}

#[test]
fn test_v4_download_url() {
    let generator = UrlGenerator::from_generator_config(generator_config(pdf_only()));

    let url = generator
        .issue_download_url("shared/notes-v2.txt")
        .unwrap();

    assert!(url.starts_with("https://storage.googleapis.com/docs/shared/notes-v2.txt?"));
    assert!(url.contains("X-Goog-SignedHeaders=host&"));
    assert!(url.contains("X-Goog-Credential=signer%40gcsurl-test.iam.gserviceaccount.com%2F"));
}
