//! Unique object name generation
//!
//! `documents/file.pdf` becomes `documents/a1b2c3d4_file.pdf` and `file.pdf` becomes
//! `a1b2c3d4_file.pdf`: the directory prefix is kept byte-for-byte and the leaf gets a
//! random 8-hex-character tag.
//!
//! The tag carries 32 bits of entropy, so collisions become likely (≈50%) after roughly
//! 77,000 names under the same prefix. Callers that need a stronger guarantee must check
//! for existing objects themselves.

use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

/// Number of random bytes in the name tag (rendered as twice as many hex characters)
pub const RANDOM_TAG_BYTES: usize = 4;

/// The operating system's random source failed
#[derive(Error, Debug)]
#[error("failed to generate random name tag: {0}")]
pub struct DerivationError(#[from] rand::Error);

/// Generates a collision-resistant object name that keeps the directory structure of
/// `original_path`
///
/// # Errors
///
/// Returns `DerivationError` if the system random source cannot be read
pub fn unique_object_name(original_path: &str) -> Result<String, DerivationError> {
    let mut bytes = [0u8; RANDOM_TAG_BYTES];
    OsRng.try_fill_bytes(&mut bytes)?;

    Ok(tagged_object_name(original_path, &hex::encode(bytes)))
}

fn tagged_object_name(original_path: &str, tag: &str) -> String {
    let (directory, file_name) = split_path(original_path);
    let (stem, extension) = split_extension(file_name);
    let tagged = format!("{tag}_{stem}{extension}");

    match directory {
        Some(directory) => format!("{directory}/{tagged}"),
        None => tagged,
    }
}

/// Splits a path at its final `/` into the directory prefix (if any) and the leaf
#[must_use]
pub fn split_path(path: &str) -> (Option<&str>, &str) {
    path.rsplit_once('/')
        .map_or((None, path), |(directory, leaf)| (Some(directory), leaf))
}

/// Extension of the last path segment, including the leading `.`; empty if there is none
#[must_use]
pub fn extension(path: &str) -> &str {
    let (_, file_name) = split_path(path);
    split_extension(file_name).1
}

/// Lowercases `extension` and adds a missing leading `.`; `None` for blank input
#[must_use]
pub fn normalize_extension(extension: &str) -> Option<String> {
    let extension = extension.trim();
    if extension.is_empty() {
        return None;
    }

    let extension = extension.to_lowercase();
    if extension.starts_with('.') {
        Some(extension)
    } else {
        Some(format!(".{extension}"))
    }
}

fn split_extension(file_name: &str) -> (&str, &str) {
    file_name
        .rfind('.')
        .map_or((file_name, ""), |index| file_name.split_at(index))
}
