// src/recipe/patch.rs

//! Textual patches against ruy's vendored CMake scripts
//!
//! Each patch is a named rule: a file relative to the source folder, the exact
//! text expected in it, and its replacement. A rule whose expected text is
//! missing fails with [`Error::PatchError`]; a silent no-op would build
//! against an upstream layout the recipe no longer understands.

use crate::error::{Error, Result};
use crate::recipe::dependency::DependencyInfo;
use crate::version::SnapshotVersion;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// First snapshot whose `ruy/CMakeLists.txt` names the imported cpuinfo target
pub const CPUINFO_TARGET_THRESHOLD: u64 = 20220628;

/// Helper script that declares every ruy library
pub const CC_LIBRARY_SCRIPT: &str = "cmake/ruy_cc_library.cmake";

/// Script that wires ruy's libraries to cpuinfo
pub const RUY_CMAKELISTS: &str = "ruy/CMakeLists.txt";

/// A single literal find-and-replace rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRule {
    /// Name used in logs and errors
    pub name: String,
    /// File to patch, relative to the source folder
    pub file: PathBuf,
    /// Exact text that must be present
    pub expected: String,
    /// Replacement for every occurrence of `expected`
    pub replacement: String,
}

impl PatchRule {
    pub fn new(
        name: impl Into<String>,
        file: impl Into<PathBuf>,
        expected: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            expected: expected.into(),
            replacement: replacement.into(),
        }
    }

    /// Apply the rule to an in-memory script
    pub fn apply_to_str(&self, content: &str) -> Result<String> {
        if !content.contains(&self.expected) {
            return Err(self.not_found());
        }
        Ok(content.replace(&self.expected, &self.replacement))
    }

    /// Apply the rule to the file under `source_dir`
    ///
    /// Returns the number of occurrences replaced.
    pub fn apply(&self, source_dir: &Path) -> Result<usize> {
        let path = source_dir.join(&self.file);
        let original = fs::read_to_string(&path).map_err(|e| {
            Error::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let occurrences = original.matches(self.expected.as_str()).count();
        let patched = self.apply_to_str(&original)?;

        debug!(
            "Patch '{}':\n{}",
            self.name,
            diffy::create_patch(&original, &patched)
        );

        fs::write(&path, patched).map_err(|e| {
            Error::IoError(format!("Failed to write {}: {}", path.display(), e))
        })?;

        info!(
            "Applied patch '{}' to {} ({} occurrence(s))",
            self.name,
            self.file.display(),
            occurrences
        );

        Ok(occurrences)
    }

    fn not_found(&self) -> Error {
        Error::PatchError {
            name: self.name.clone(),
            file: self.file.display().to_string(),
            expected: self.expected.clone(),
        }
    }
}

/// Let `shared` decide the library type instead of forcing static
pub fn shared_library_type() -> PatchRule {
    PatchRule::new(
        "shared-library-type",
        CC_LIBRARY_SCRIPT,
        "add_library(${_NAME} STATIC",
        "add_library(${_NAME}",
    )
}

/// Compute library subdirectories relative to the nested source folder
///
/// The meta-build root sits one level above the source folder, so
/// `${CMAKE_SOURCE_DIR}` needs the source subfolder appended.
pub fn relative_subdir(source_subfolder: &str) -> PatchRule {
    PatchRule::new(
        "relative-subdir",
        CC_LIBRARY_SCRIPT,
        "file(RELATIVE_PATH _SUBDIR ${CMAKE_SOURCE_DIR} ${CMAKE_CURRENT_LIST_DIR})",
        format!(
            "file(RELATIVE_PATH _SUBDIR ${{CMAKE_SOURCE_DIR}}/{} ${{CMAKE_CURRENT_LIST_DIR}})",
            source_subfolder
        ),
    )
}

/// Name of the CMake variable holding the cpuinfo reference, and its stock value
pub fn cpuinfo_variable(version: SnapshotVersion) -> (&'static str, &'static str) {
    if version.number() < CPUINFO_TARGET_THRESHOLD {
        ("ruy_6_cpuinfo", "cpuinfo")
    } else {
        ("ruy_6_cpuinfo_cpuinfo", "cpuinfo::cpuinfo")
    }
}

/// Link every cpuinfo library, not just the primary one
///
/// ruy only names `cpuinfo`, but shared builds also need `clog` from the same
/// package and its system libraries.
pub fn cpuinfo_link_libraries(version: SnapshotVersion, cpuinfo: &DependencyInfo) -> PatchRule {
    let (variable, stock) = cpuinfo_variable(version);
    PatchRule::new(
        "cpuinfo-link-libraries",
        RUY_CMAKELISTS,
        format!("set({} \"{}\")", variable, stock),
        format!("set({} \"{}\")", variable, cpuinfo.cmake_link_list()),
    )
}

/// All rules for a ruy snapshot, in application order
pub fn ruy_patches(
    version: SnapshotVersion,
    source_subfolder: &str,
    cpuinfo: &DependencyInfo,
) -> Vec<PatchRule> {
    vec![
        shared_library_type(),
        relative_subdir(source_subfolder),
        cpuinfo_link_libraries(version, cpuinfo),
    ]
}

/// Apply rules in order, stopping at the first failure
pub fn apply_all(rules: &[PatchRule], source_dir: &Path) -> Result<()> {
    for rule in rules {
        rule.apply(source_dir)?;
    }
    Ok(())
}
