// src/error.rs

//! Error types for the ruy recipe
//!
//! Every phase of the pipeline reports through a single [`Error`] enum. The
//! variants map one-to-one onto the phase that failed, so callers can tell a
//! rejected configuration apart from a broken download or a vendored script
//! that no longer matches what the recipe expects.

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while cooking the recipe
#[derive(Error, Debug)]
pub enum Error {
    /// Unsupported compiler, build type, C++ standard or version shape
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),

    /// Source record missing, download failed, or checksum mismatch
    #[error("Source acquisition failed: {0}")]
    AcquisitionError(String),

    /// Expected text not found in a vendored build script
    #[error("Patch '{name}' failed: expected text not found in {file}: {expected}")]
    PatchError {
        name: String,
        file: String,
        expected: String,
    },

    /// The underlying build tool exited unsuccessfully
    #[error("{step} step failed with {status}\nstderr: {stderr}")]
    BuildError {
        step: String,
        status: String,
        stderr: String,
    },

    /// A declared requirement could not be resolved
    #[error("Dependency resolution failed: {0}")]
    DependencyError(String),

    /// Malformed profile, registry or dependency document
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}

impl Error {
    /// Short name of the error category, used in CLI output and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigurationError(_) => "configuration",
            Self::AcquisitionError(_) => "acquisition",
            Self::PatchError { .. } => "patch",
            Self::BuildError { .. } => "build",
            Self::DependencyError(_) => "dependency",
            Self::ParseError(_) => "parse",
            Self::IoError(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_error_names_pattern_and_file() {
        let err = Error::PatchError {
            name: "shared-library-type".to_string(),
            file: "cmake/ruy_cc_library.cmake".to_string(),
            expected: "add_library(${_NAME} STATIC".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("shared-library-type"));
        assert!(msg.contains("cmake/ruy_cc_library.cmake"));
        assert!(msg.contains("add_library(${_NAME} STATIC"));
        assert_eq!(err.kind(), "patch");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::IoError(ref m) if m.contains("missing")));
    }
}
