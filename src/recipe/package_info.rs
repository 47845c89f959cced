// src/recipe/package_info.rs

//! The public link surface of the built package

use crate::error::{Error, Result};
use crate::recipe::settings::Os;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Libraries produced by ruy's minimal CMake build, in link order
pub const RUY_LIBS: &[&str] = &[
    "ruy_frontend",
    "ruy_context",
    "ruy_trmul",
    "ruy_thread_pool",
    "ruy_blocking_counter",
    "ruy_prepare_packed_matrices",
    "ruy_ctx",
    "ruy_allocator",
    "ruy_prepacked_cache",
    "ruy_tune",
    "ruy_wait",
    "ruy_apply_multiplier",
    "ruy_block_map",
    "ruy_context_get_ctx",
    "ruy_cpuinfo",
    "ruy_denormal",
    "ruy_have_built_path_for_avx",
    "ruy_have_built_path_for_avx2_fma",
    "ruy_have_built_path_for_avx512",
    "ruy_kernel_arm",
    "ruy_kernel_avx",
    "ruy_kernel_avx2_fma",
    "ruy_kernel_avx512",
    "ruy_pack_arm",
    "ruy_pack_avx",
    "ruy_pack_avx2_fma",
    "ruy_pack_avx512",
    "ruy_system_aligned_alloc",
    "ruy_profiler_instrumentation",
    "ruy_profiler_profiler",
];

/// System libraries needed on Linux and FreeBSD
pub const POSIX_SYSTEM_LIBS: &[&str] = &["m", "pthread"];

/// Filename of the manifest written to the package root
pub const PACKAGE_MANIFEST: &str = "ruy-package.json";

/// What consumers must link against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Package reference (`name/version`)
    pub reference: String,
    /// Library artifacts, in link order
    pub libs: Vec<String>,
    /// System libraries
    pub system_libs: Vec<String>,
    /// Include directories relative to the package root
    pub include_dirs: Vec<String>,
    /// Library directories relative to the package root
    pub lib_dirs: Vec<String>,
}

impl PackageInfo {
    /// Declare the ruy link surface for a target OS
    pub fn for_ruy(reference: &str, os: &Os) -> Self {
        let system_libs = if os.needs_posix_system_libs() {
            POSIX_SYSTEM_LIBS.iter().map(|s| s.to_string()).collect()
        } else {
            Vec::new()
        };

        Self {
            reference: reference.to_string(),
            libs: RUY_LIBS.iter().map(|s| s.to_string()).collect(),
            system_libs,
            include_dirs: vec!["include".to_string()],
            lib_dirs: vec!["lib".to_string()],
        }
    }

    /// Write the manifest into a package folder
    pub fn write(&self, package_dir: &Path) -> Result<PathBuf> {
        let path = package_dir.join(PACKAGE_MANIFEST);
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ParseError(format!("Failed to serialize package info: {}", e)))?;
        fs::write(&path, json)
            .map_err(|e| Error::IoError(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(path)
    }

    /// Read a manifest back from a package folder
    pub fn read(package_dir: &Path) -> Result<Self> {
        let path = package_dir.join(PACKAGE_MANIFEST);
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::IoError(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::ParseError(format!("Invalid package manifest: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_declares_posix_libs() {
        let info = PackageInfo::for_ruy("ruy/cci.20201217", &Os::Linux);
        assert_eq!(info.libs.len(), RUY_LIBS.len());
        assert_eq!(info.libs.first().map(String::as_str), Some("ruy_frontend"));
        assert_eq!(
            info.libs.last().map(String::as_str),
            Some("ruy_profiler_profiler")
        );
        assert_eq!(info.system_libs, vec!["m", "pthread"]);

        let freebsd = PackageInfo::for_ruy("ruy/cci.20201217", &Os::FreeBSD);
        assert_eq!(freebsd.system_libs, vec!["m", "pthread"]);
    }

    #[test]
    fn test_other_os_has_no_system_libs() {
        for os in [Os::Windows, Os::Macos, Os::Android] {
            let info = PackageInfo::for_ruy("ruy/cci.20201217", &os);
            assert!(info.system_libs.is_empty(), "{}", os);
            assert_eq!(info.libs.len(), RUY_LIBS.len());
        }
    }

    #[test]
    fn test_libs_are_unique() {
        let mut names: Vec<&str> = RUY_LIBS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RUY_LIBS.len());
    }

    #[test]
    fn test_write_and_read_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let info = PackageInfo::for_ruy("ruy/cci.20201217", &Os::Linux);
        let path = info.write(dir.path()).unwrap();
        assert!(path.ends_with(PACKAGE_MANIFEST));
        assert_eq!(PackageInfo::read(dir.path()).unwrap(), info);
    }
}
