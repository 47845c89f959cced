// src/recipe/dependency.rs

//! Resolved dependencies
//!
//! The recipe declares requirements by `name/version`. Resolving them is the
//! caller's job: a [`DependencyProvider`] turns each requirement into a
//! [`DependencyInfo`] describing where the built package lives and which
//! libraries it exposes.

use crate::error::{Error, Result};
use crate::recipe::format::Requirement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A resolved dependency package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyInfo {
    /// Package name (filled from the table key when parsed)
    #[serde(default)]
    pub name: String,

    /// Resolved version
    pub version: String,

    /// Package root folder
    pub root: PathBuf,

    /// Libraries the package provides, in link order
    #[serde(default)]
    pub libs: Vec<String>,

    /// System libraries the package needs
    #[serde(default)]
    pub system_libs: Vec<String>,

    /// Include directories, relative to `root`
    #[serde(default = "default_include_dirs")]
    pub include_dirs: Vec<String>,

    /// Library directories, relative to `root`
    #[serde(default = "default_lib_dirs")]
    pub lib_dirs: Vec<String>,
}

fn default_include_dirs() -> Vec<String> {
    vec!["include".to_string()]
}

fn default_lib_dirs() -> Vec<String> {
    vec!["lib".to_string()]
}

impl DependencyInfo {
    /// Own libraries followed by system libraries
    pub fn all_libs(&self) -> Vec<&str> {
        self.libs
            .iter()
            .chain(self.system_libs.iter())
            .map(|s| s.as_str())
            .collect()
    }

    /// All link names joined as a CMake list (`a;b;c`)
    pub fn cmake_link_list(&self) -> String {
        self.all_libs().join(";")
    }

    /// Absolute include directories
    pub fn include_paths(&self) -> Vec<PathBuf> {
        self.include_dirs.iter().map(|d| self.root.join(d)).collect()
    }

    /// Absolute library directories
    pub fn lib_paths(&self) -> Vec<PathBuf> {
        self.lib_dirs.iter().map(|d| self.root.join(d)).collect()
    }
}

/// Trait for resolving declared requirements
///
/// Implementations might consult a local package cache, a lockfile, or a
/// static document written by the caller.
pub trait DependencyProvider: Send + Sync {
    /// Resolve a single requirement
    fn resolve(&self, requirement: &Requirement) -> Result<DependencyInfo>;
}

/// Provider backed by a fixed set of packages
///
/// Parsed from a TOML document of `[dependencies.<name>]` tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticDependencies {
    #[serde(default)]
    pub dependencies: BTreeMap<String, DependencyInfo>,
}

impl StaticDependencies {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package
    pub fn insert(&mut self, info: DependencyInfo) {
        self.dependencies.insert(info.name.clone(), info);
    }

    /// Fill in names from table keys and make relative roots absolute
    pub(crate) fn normalize(&mut self, base_dir: &Path) {
        for (name, info) in self.dependencies.iter_mut() {
            if info.name.is_empty() {
                info.name = name.clone();
            }
            if info.root.is_relative() {
                info.root = base_dir.join(&info.root);
            }
        }
    }
}

impl DependencyProvider for StaticDependencies {
    fn resolve(&self, requirement: &Requirement) -> Result<DependencyInfo> {
        let info = self.dependencies.get(&requirement.name).ok_or_else(|| {
            Error::DependencyError(format!("'{}' was not provided", requirement))
        })?;

        if info.version != requirement.version {
            warn!(
                "Requirement {} resolved to version {}",
                requirement, info.version
            );
        }

        debug!(
            "Resolved {} at {} (libs: {})",
            requirement,
            info.root.display(),
            info.all_libs().join(", ")
        );

        Ok(info.clone())
    }
}
