// src/version/mod.rs

//! Version handling for compilers and recipe snapshots
//!
//! Two version shapes matter to the recipe:
//! - Compiler versions such as `"9"`, `"3.4"` or `"16.11.2"`, compared
//!   numerically with missing components treated as zero (`5` == `5.0`).
//! - Snapshot versions such as `"cci.20201217"`, where the suffix after the
//!   `cci.` prefix is a date-like integer.

use crate::error::{Error, Result};
use semver::Version;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Prefix carried by every snapshot version of the recipe
pub const SNAPSHOT_PREFIX: &str = "cci.";

/// A dotted numeric compiler version
#[derive(Debug, Clone)]
pub struct CompilerVersion {
    raw: String,
    normalized: Version,
}

impl CompilerVersion {
    /// Parse a compiler version string
    ///
    /// Format: major[.minor[.patch]]
    /// Examples:
    /// - "9" → 9.0.0
    /// - "3.4" → 3.4.0
    /// - "16.11.2.3" is rejected, a fourth component would not take part
    ///   in comparisons
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::ConfigurationError(
                "Empty compiler version".to_string(),
            ));
        }

        let components: Vec<&str> = trimmed.split('.').collect();
        if components.len() > 3 {
            return Err(Error::ConfigurationError(format!(
                "Invalid compiler version '{}': at most three components are supported",
                s
            )));
        }

        let mut parts = [0u64; 3];
        for (slot, part) in parts.iter_mut().zip(components) {
            *slot = part.parse::<u64>().map_err(|_| {
                Error::ConfigurationError(format!("Invalid compiler version '{}'", s))
            })?;
        }

        Ok(Self {
            raw: trimmed.to_string(),
            normalized: Version::new(parts[0], parts[1], parts[2]),
        })
    }

    /// The version as it was written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The major component
    pub fn major(&self) -> u64 {
        self.normalized.major
    }
}

impl FromStr for CompilerVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CompilerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl PartialEq for CompilerVersion {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for CompilerVersion {}

impl std::hash::Hash for CompilerVersion {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl Ord for CompilerVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized.cmp(&other.normalized)
    }
}

impl PartialOrd for CompilerVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A `cci.<number>` snapshot version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotVersion(u64);

impl SnapshotVersion {
    /// Parse a snapshot version
    ///
    /// The exact `cci.` prefix is required and the remainder must be a
    /// non-empty run of ASCII digits. Anything else is rejected.
    pub fn parse(s: &str) -> Result<Self> {
        let digits = s.strip_prefix(SNAPSHOT_PREFIX).ok_or_else(|| {
            Error::ConfigurationError(format!(
                "Version '{}' does not start with '{}'",
                s, SNAPSHOT_PREFIX
            ))
        })?;

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::ConfigurationError(format!(
                "Version '{}' has a non-numeric suffix after '{}'",
                s, SNAPSHOT_PREFIX
            )));
        }

        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|e| Error::ConfigurationError(format!("Version '{}' out of range: {}", s, e)))
    }

    /// The numeric suffix
    pub fn number(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SnapshotVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", SNAPSHOT_PREFIX, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> CompilerVersion {
        CompilerVersion::parse(s).unwrap()
    }

    #[test]
    fn test_compiler_version_parse_simple() {
        assert_eq!(v("9").major(), 9);
        assert_eq!(v("3.4").as_str(), "3.4");
    }

    #[test]
    fn test_compiler_version_missing_components_are_zero() {
        assert_eq!(v("5").cmp(&v("5.0")), Ordering::Equal);
        assert_eq!(v("5.0.0").cmp(&v("5")), Ordering::Equal);
        assert_eq!(v("5"), v("5.0"));
        assert!(v("5.1") > v("5"));
    }

    #[test]
    fn test_compiler_version_compare() {
        assert!(v("3.3") < v("3.4"));
        assert!(v("3.10") > v("3.4"));
        assert!(v("14") < v("15"));
        assert!(v("16.11.2") > v("16.11"));
    }

    #[test]
    fn test_compiler_version_invalid() {
        assert!(CompilerVersion::parse("").is_err());
        assert!(CompilerVersion::parse("nine").is_err());
        assert!(CompilerVersion::parse("9.x").is_err());
    }

    #[test]
    fn test_compiler_version_rejects_extra_components() {
        let err = CompilerVersion::parse("5.0.0.1").unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(ref m) if m.contains("at most three")));
        assert!(CompilerVersion::parse("16.11.2.3").is_err());
        // Three components are still fine
        assert_eq!(v("16.11.2").as_str(), "16.11.2");
    }

    #[test]
    fn test_snapshot_version_parse() {
        let snap = SnapshotVersion::parse("cci.20201217").unwrap();
        assert_eq!(snap.number(), 20201217);
        assert_eq!(snap.to_string(), "cci.20201217");
    }

    #[test]
    fn test_snapshot_version_rejects_other_shapes() {
        assert!(SnapshotVersion::parse("20201217").is_err());
        assert!(SnapshotVersion::parse("cci.").is_err());
        assert!(SnapshotVersion::parse("cci.2020-12-17").is_err());
        assert!(SnapshotVersion::parse("1.0.0").is_err());
        // Only the exact prefix is stripped, never stray characters
        assert!(SnapshotVersion::parse("ccci.20201217").is_err());
    }
}
