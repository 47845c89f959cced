// src/recipe/kitchen/archive.rs

//! Archive and source file utilities for the Kitchen

use crate::error::{Error, Result};
use crate::hash::{normalize_sha256, sha256_file};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Timeout for a single source download
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Download a file from a URL
///
/// `http(s)://` URLs are fetched; `file://` URLs and plain paths are copied.
/// The file is written next to `dest` first and renamed into place, so a
/// failed download never leaves a partial file at `dest`.
pub fn download_file(url: &str, dest: &Path) -> Result<()> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut staged = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| Error::IoError(format!("Failed to create staging file: {}", e)))?;

    if url.starts_with("http://") || url.starts_with("https://") {
        let client = reqwest::blocking::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| Error::AcquisitionError(format!("HTTP client error: {}", e)))?;

        let mut response = client
            .get(url)
            .send()
            .map_err(|e| Error::AcquisitionError(format!("Failed to download {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::AcquisitionError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        io::copy(&mut response, staged.as_file_mut())
            .map_err(|e| Error::AcquisitionError(format!("Failed to write {}: {}", url, e)))?;
    } else {
        let local = local_path(url)?;
        let mut source = File::open(&local).map_err(|e| {
            Error::AcquisitionError(format!("Failed to open {}: {}", local.display(), e))
        })?;
        io::copy(&mut source, staged.as_file_mut())
            .map_err(|e| Error::AcquisitionError(format!("Failed to copy {}: {}", url, e)))?;
    }

    staged
        .persist(dest)
        .map_err(|e| Error::IoError(format!("Failed to move download to {}: {}", dest.display(), e)))?;

    debug!("Downloaded {} to {}", url, dest.display());
    Ok(())
}

/// Filesystem path for a `file://` URL or a plain path
///
/// Percent-escapes are decoded and a `localhost` host is accepted.
fn local_path(url: &str) -> Result<PathBuf> {
    if !url.starts_with("file:") {
        return Ok(PathBuf::from(url));
    }
    let parsed = url::Url::parse(url)
        .map_err(|e| Error::AcquisitionError(format!("Invalid URL '{}': {}", url, e)))?;
    parsed
        .to_file_path()
        .map_err(|_| Error::AcquisitionError(format!("Not a local file URL: {}", url)))
}

/// Verify a file against an expected SHA-256
///
/// Returns `Ok(false)` on mismatch; errors only when the file cannot be read
/// or the expected checksum is malformed.
pub fn verify_file_checksum(path: &Path, expected: &str) -> Result<bool> {
    let expected = normalize_sha256(expected)?;
    let actual = sha256_file(path)?;
    Ok(actual == expected)
}

/// Extract an archive to a destination directory
///
/// Supports: .tar.gz, .tgz, .tar
///
/// With `strip_root`, the first path component of every entry is dropped, so
/// the contents of the archive's wrapping directory land directly in `dest`.
pub fn extract_archive(archive: &Path, dest: &Path, strip_root: bool) -> Result<usize> {
    let filename = archive
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let file = File::open(archive).map_err(|e| {
        Error::AcquisitionError(format!("Failed to open {}: {}", archive.display(), e))
    })?;

    let reader: Box<dyn Read> = if filename.ends_with(".tar.gz") || filename.ends_with(".tgz") {
        Box::new(GzDecoder::new(file))
    } else if filename.ends_with(".tar") {
        Box::new(file)
    } else {
        return Err(Error::AcquisitionError(format!(
            "Unknown archive format: {}",
            filename
        )));
    };

    fs::create_dir_all(dest)?;
    unpack_tar(tar::Archive::new(reader), dest, strip_root)
}

fn unpack_tar<R: Read>(mut archive: tar::Archive<R>, dest: &Path, strip_root: bool) -> Result<usize> {
    let mut count = 0;
    let entries = archive
        .entries()
        .map_err(|e| Error::AcquisitionError(format!("Corrupt archive: {}", e)))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| Error::AcquisitionError(format!("Corrupt archive: {}", e)))?;
        let entry_type = entry.header().entry_type();
        if entry_type.is_pax_global_extensions() || entry_type.is_pax_local_extensions() {
            continue;
        }
        let path = entry
            .path()
            .map_err(|e| Error::AcquisitionError(format!("Invalid entry path: {}", e)))?
            .into_owned();

        let relative = match entry_destination(&path, strip_root)? {
            Some(p) => p,
            None => continue,
        };

        let target = dest.join(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        entry.unpack(&target).map_err(|e| {
            Error::AcquisitionError(format!("Failed to extract {}: {}", relative.display(), e))
        })?;
        count += 1;
    }

    info!("Extracted {} entries to {}", count, dest.display());
    Ok(count)
}

/// Map an archive entry path to its path below the destination
///
/// Returns `None` for entries that vanish after stripping (the wrapping
/// directory itself).
fn entry_destination(path: &Path, strip_root: bool) -> Result<Option<PathBuf>> {
    let mut relative = PathBuf::new();
    for (i, component) in path.components().enumerate() {
        match component {
            Component::Normal(part) => {
                if strip_root && i == 0 {
                    continue;
                }
                relative.push(part);
            }
            Component::CurDir => {}
            _ => {
                return Err(Error::AcquisitionError(format!(
                    "Archive entry escapes the source folder: {}",
                    path.display()
                )));
            }
        }
    }

    if relative.as_os_str().is_empty() {
        return Ok(None);
    }
    Ok(Some(relative))
}

/// Delete every file below `root` whose name matches `pattern`
///
/// Returns the number of files removed. A missing root removes nothing.
pub fn remove_matching(root: &Path, pattern: &str) -> Result<usize> {
    let pattern = glob::Pattern::new(pattern)
        .map_err(|e| Error::ParseError(format!("Invalid pattern '{}': {}", pattern, e)))?;

    if !root.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| Error::IoError(format!("Failed to walk {}: {}", root.display(), e)))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if pattern.matches(&name) {
            debug!("Removing {}", entry.path().display());
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }

    Ok(removed)
}
