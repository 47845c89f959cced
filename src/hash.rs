// src/hash.rs

//! SHA-256 checksums for source archive verification
//!
//! Source records carry a lowercase hex SHA-256 digest. The `sha256:` prefix
//! used by other recipe formats is accepted and ignored.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Length of a SHA-256 digest in hex characters
pub const SHA256_HEX_LEN: usize = 64;

/// Compute the SHA-256 of a byte slice as lowercase hex
pub fn sha256_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Compute the SHA-256 of everything readable from `reader`
pub fn sha256_reader<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Compute the SHA-256 of a file
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .map_err(|e| Error::IoError(format!("Failed to open {}: {}", path.display(), e)))?;
    sha256_reader(&mut file)
        .map_err(|e| Error::IoError(format!("Failed to read {}: {}", path.display(), e)))
}

/// Normalize an expected checksum to bare lowercase hex
///
/// Accepts `"<hex>"` and `"sha256:<hex>"`.
pub fn normalize_sha256(expected: &str) -> Result<String> {
    let hex_part = match expected.split_once(':') {
        Some(("sha256", rest)) => rest,
        Some((algo, _)) => {
            return Err(Error::ParseError(format!(
                "Unsupported checksum algorithm: {} (supported: sha256)",
                algo
            )));
        }
        None => expected,
    };

    if hex_part.len() != SHA256_HEX_LEN || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::ParseError(format!(
            "Invalid sha256 checksum: {}",
            expected
        )));
    }

    Ok(hex_part.to_ascii_lowercase())
}
