// src/recipe/kitchen/config.rs

//! Configuration types for the Kitchen

use crate::recipe::options::Options;
use crate::recipe::package_info::PackageInfo;
use crate::recipe::settings::BuildType;
use std::path::{Path, PathBuf};

/// Subfolder of the recipe root that receives the extracted sources
pub const SOURCE_SUBFOLDER: &str = "src";

/// Configuration for the Kitchen
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Meta-build root: receives the wrapper CMakeLists.txt; sources go in
    /// `<recipe_root>/src` and the build in `<recipe_root>/build/<type>`
    pub recipe_root: PathBuf,
    /// Where the final artifacts are installed
    pub package_dir: PathBuf,
    /// Directory for downloaded source archives
    pub download_cache: PathBuf,
    /// Number of parallel build jobs
    pub jobs: u32,
    /// CMake program (discovered on PATH when unset)
    pub cmake: Option<PathBuf>,
    /// Keep the build folder after packaging (for debugging)
    pub keep_build_folder: bool,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        Self {
            recipe_root: PathBuf::from("."),
            package_dir: PathBuf::from("package"),
            download_cache: PathBuf::from("downloads"),
            jobs,
            cmake: None,
            keep_build_folder: false,
        }
    }
}

impl KitchenConfig {
    /// Configuration rooted at a working directory
    ///
    /// Lays out `package/` and `downloads/` next to the recipe root's
    /// `src/` and `build/` folders.
    pub fn in_dir(root: &Path) -> Self {
        Self {
            recipe_root: root.to_path_buf(),
            package_dir: root.join("package"),
            download_cache: root.join("downloads"),
            ..Self::default()
        }
    }

    /// Folder the upstream sources are extracted into
    pub fn source_folder(&self) -> PathBuf {
        self.recipe_root.join(SOURCE_SUBFOLDER)
    }

    /// Folder CMake builds in for a build type
    pub fn build_folder(&self, build_type: BuildType) -> PathBuf {
        self.recipe_root.join("build").join(build_type.as_str())
    }

    /// Folder generated toolchain and dependency files are written to
    pub fn generators_folder(&self, build_type: BuildType) -> PathBuf {
        self.build_folder(build_type).join("generators")
    }
}

/// Result of cooking the recipe
#[derive(Debug)]
pub struct CookResult {
    /// Package folder holding the installed artifacts
    pub package_dir: PathBuf,
    /// Options after resolution
    pub options: Options,
    /// Declared link surface
    pub package_info: PackageInfo,
    /// Names of the patches that were applied
    pub applied_patches: Vec<String>,
    /// Number of debug symbol files pruned from the package
    pub pruned_debug_symbols: usize,
    /// Build log
    pub log: String,
    /// Warnings generated during the build
    pub warnings: Vec<String>,
}
