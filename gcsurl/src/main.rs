use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use gcsurl::{ObjectNaming, UploadOptions, UploadRestrictions, UrlGenerator};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "gcsurl", about = "Issue signed Google Cloud Storage URLs")]
struct Cli {
    /// Bucket to use instead of GCS_BUCKET_NAME
    #[arg(long, global = true)]
    bucket: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a signed PUT URL
    Upload {
        /// Object path, e.g. users/123/contract.pdf
        path: String,
        /// URL lifetime in minutes instead of the configured default
        #[arg(long)]
        expiry_minutes: Option<u64>,
        /// Store the object under the given path instead of a unique name
        #[arg(long)]
        keep_name: bool,
    },
    /// Issue a signed GET URL
    Download {
        /// Object path
        path: String,
        /// URL lifetime in minutes instead of the configured default
        #[arg(long)]
        expiry_minutes: Option<u64>,
    },
    /// Check a file name against the upload restrictions
    Validate {
        /// File name to check
        filename: String,
    },
    /// Print the resolved configuration
    Config,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DownloadOutput<'a> {
    download_url: String,
    bucket: &'a str,
    path: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateOutput<'a> {
    filename: &'a str,
    allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigOutput<'a> {
    bucket_name: &'a str,
    project_id: Option<&'a str>,
    default_expiry_minutes: u64,
    upload_restrictions: &'a UploadRestrictions,
    has_upload_restrictions: bool,
    has_signing_credentials: bool,
}

fn init_tracing() {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    // stdout carries only JSON output
    if json {
        fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}

fn minutes(expiry_minutes: Option<u64>) -> Duration {
    Duration::from_secs(expiry_minutes.unwrap_or(0).saturating_mul(60))
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let generator = UrlGenerator::with_bucket(cli.bucket.as_deref().unwrap_or_default())
        .context("failed to configure URL generator")?;

    match cli.command {
        Commands::Upload {
            path,
            expiry_minutes,
            keep_name,
        } => {
            let naming = if keep_name {
                ObjectNaming::Verbatim
            } else {
                ObjectNaming::Unique
            };
            let options = UploadOptions::new()
                .with_expiry(minutes(expiry_minutes))
                .with_naming(naming);

            let result = generator
                .issue_upload_url_with_options(&path, &options)
                .with_context(|| format!("failed to issue upload URL for {path}"))?;
            print_json(&result)?;
        }
        Commands::Download {
            path,
            expiry_minutes,
        } => {
            let download_url = generator
                .issue_download_url_with_expiry(
                    generator.bucket_name(),
                    &path,
                    minutes(expiry_minutes),
                )
                .with_context(|| format!("failed to issue download URL for {path}"))?;
            print_json(&DownloadOutput {
                download_url,
                bucket: generator.bucket_name(),
                path: &path,
            })?;
        }
        Commands::Validate { filename } => {
            let result = generator.validate_upload(&filename);
            print_json(&ValidateOutput {
                filename: &filename,
                allowed: result.is_ok(),
                error: result.as_ref().err().map(ToString::to_string),
            })?;
            result?;
        }
        Commands::Config => {
            print_json(&ConfigOutput {
                bucket_name: generator.bucket_name(),
                project_id: generator.project_id(),
                default_expiry_minutes: generator.default_expiry_minutes(),
                upload_restrictions: generator.upload_restrictions(),
                has_upload_restrictions: generator.has_upload_restrictions(),
                has_signing_credentials: generator.has_signing_credentials(),
            })?;
        }
    }

    Ok(())
}
