// src/recipe/format.rs

//! Recipe data definitions
//!
//! The recipe's descriptive metadata is fixed at compile time. The version
//! registry (which archive to fetch for which version) and the build profile
//! are TOML documents supplied by the caller.

use crate::error::{Error, Result};
use crate::recipe::options::OptionsRequest;
use crate::recipe::settings::Settings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Immutable descriptive metadata of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeMetadata {
    /// Package name
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
    /// License identifier (SPDX)
    pub license: &'static str,
    /// Upstream homepage
    pub homepage: &'static str,
    /// Where the recipe itself is maintained
    pub url: &'static str,
    /// Topic tags
    pub topics: &'static [&'static str],
    /// Declared requirements (`name/version`)
    pub requires: &'static [&'static str],
}

/// Metadata for the ruy recipe
pub const RUY_METADATA: RecipeMetadata = RecipeMetadata {
    name: "ruy",
    description: "ruy is a matrix multiplication library.\n\
                  Its focus is to cover the matrix multiplication needs of neural network inference engines\n",
    license: "Apache-2.0",
    homepage: "https://github.com/google/ruy",
    url: "https://github.com/conan-io/conan-center-index",
    topics: &["matrix", "multiplication", "neural", "network", "AI", "tensorflow"],
    requires: &["cpuinfo/cci.20201217"],
};

/// A `name/version` requirement reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    pub version: String,
}

impl Requirement {
    /// Parse a `name/version` reference
    pub fn parse(reference: &str) -> Result<Self> {
        let (name, version) = reference.split_once('/').ok_or_else(|| {
            Error::ParseError(format!(
                "Invalid requirement '{}': expected name/version",
                reference
            ))
        })?;

        if name.is_empty() || version.is_empty() {
            return Err(Error::ParseError(format!(
                "Invalid requirement '{}': empty name or version",
                reference
            )));
        }

        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
        })
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// Where to fetch the upstream archive for one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Archive URL (`https://`, `file://` or a plain path)
    pub url: String,
    /// SHA-256 of the archive
    pub sha256: String,
    /// Strip the single top-level directory on extraction
    #[serde(default = "default_strip_root")]
    pub strip_root: bool,
}

fn default_strip_root() -> bool {
    true
}

impl SourceRecord {
    /// Archive filename taken from the URL
    pub fn archive_filename(&self) -> String {
        self.url
            .split('/')
            .next_back()
            .filter(|s| !s.is_empty())
            .unwrap_or("source.tar.gz")
            .to_string()
    }
}

/// Mapping from version string to source record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRegistry {
    #[serde(default)]
    pub sources: BTreeMap<String, SourceRecord>,
}

impl SourceRegistry {
    /// Look up the record registered for `version`
    pub fn get(&self, version: &str) -> Result<&SourceRecord> {
        self.sources.get(version).ok_or_else(|| {
            Error::AcquisitionError(format!(
                "No source registered for version '{}' (known: {})",
                version,
                self.versions().join(", ")
            ))
        })
    }

    /// Register a record for a version
    pub fn insert(&mut self, version: &str, record: SourceRecord) {
        self.sources.insert(version.to_string(), record);
    }

    /// All registered versions, in sorted order
    pub fn versions(&self) -> Vec<&str> {
        self.sources.keys().map(|s| s.as_str()).collect()
    }
}

/// Settings plus requested options: the caller's build profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub settings: Settings,
    #[serde(default)]
    pub options: OptionsRequest,
}

/// A recipe instantiated for one version
#[derive(Debug, Clone)]
pub struct Recipe {
    /// Descriptive metadata
    pub metadata: RecipeMetadata,
    /// Requested version (e.g., `cci.20201217`)
    pub version: String,
}

impl Recipe {
    /// The ruy recipe at `version`
    pub fn ruy(version: &str) -> Self {
        Self {
            metadata: RUY_METADATA,
            version: version.to_string(),
        }
    }

    /// Parsed requirements
    pub fn requirements(&self) -> Result<Vec<Requirement>> {
        self.metadata
            .requires
            .iter()
            .map(|r| Requirement::parse(r))
            .collect()
    }

    /// `name/version` reference of this recipe
    pub fn reference(&self) -> String {
        format!("{}/{}", self.metadata.name, self.version)
    }
}
