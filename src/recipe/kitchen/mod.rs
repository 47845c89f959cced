// src/recipe/kitchen/mod.rs

//! Kitchen: where the recipe is cooked
//!
//! The Kitchen owns the folder layout, the source registry, the dependency
//! provider and the build tool. It handles:
//! - Validating the profile and resolving options
//! - Fetching, verifying and extracting the upstream archive
//! - Generating CMake inputs and patching vendored scripts
//! - Building, installing and declaring the package's link surface

mod archive;
pub mod cmake;
mod config;
mod cook;
pub mod toolchain;

pub use archive::{download_file, extract_archive, verify_file_checksum};
pub use cmake::{BuildTool, CMake, ConfigureArgs, StepOutput};
pub use config::{CookResult, KitchenConfig, SOURCE_SUBFOLDER};
use cook::Cook;

use crate::error::{Error, Result};
use crate::hash::{normalize_sha256, sha256_file};
use crate::recipe::dependency::DependencyProvider;
use crate::recipe::format::{Profile, Recipe, SourceRecord, SourceRegistry};
use crate::recipe::options::Options;
use crate::recipe::validate::validate;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The Kitchen: where recipes are cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
    registry: SourceRegistry,
    provider: Arc<dyn DependencyProvider>,
    /// Build tool override; CMake is used when unset
    build_tool: Option<Arc<dyn BuildTool>>,
}

impl Kitchen {
    /// Create a new Kitchen
    pub fn new(
        config: KitchenConfig,
        registry: SourceRegistry,
        provider: Arc<dyn DependencyProvider>,
    ) -> Self {
        Self {
            config,
            registry,
            provider,
            build_tool: None,
        }
    }

    /// Use a specific build tool instead of CMake
    pub fn with_build_tool(mut self, tool: Arc<dyn BuildTool>) -> Self {
        self.build_tool = Some(tool);
        self
    }

    /// The kitchen's configuration
    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// The build tool for this kitchen
    pub(crate) fn build_tool(&self) -> Result<Arc<dyn BuildTool>> {
        if let Some(tool) = &self.build_tool {
            return Ok(Arc::clone(tool));
        }
        let cmake = match &self.config.cmake {
            Some(program) => CMake::new(program),
            None => CMake::discover()?,
        };
        Ok(Arc::new(cmake))
    }

    /// Validate a profile and resolve its options without building
    ///
    /// Returns the resolved options and any warnings.
    pub fn configure(&self, recipe: &Recipe, profile: &Profile) -> Result<(Options, Vec<String>)> {
        let warnings = validate(&profile.settings, &recipe.version)?;
        let options = Options::resolve(&profile.settings, &profile.options);
        Ok((options, warnings))
    }

    /// Cook the recipe for a profile
    ///
    /// This is the main entry point.
    ///
    /// ## Cooking Process
    /// 1. **Validate**: reject unsupported compiler/build type combinations
    /// 2. **Options**: resolve platform-conditional options
    /// 3. **Requirements**: resolve declared dependencies
    /// 4. **Source**: fetch, verify and extract the upstream archive
    /// 5. **Build**: generate CMake inputs, patch, configure and build
    /// 6. **Package**: install, copy license, prune debug symbols, declare libs
    ///
    /// The first failing phase stops the pipeline.
    pub fn cook(&self, recipe: &Recipe, profile: &Profile) -> Result<CookResult> {
        info!("Cooking {}", recipe.reference());

        info!("Validating configuration...");
        let mut cook = Cook::new(self, recipe, profile)?;

        info!("Resolving requirements...");
        cook.requirements()?;

        info!("Acquiring sources...");
        cook.source()?;

        info!("Patching and building...");
        cook.generate()?;
        cook.patch()?;
        cook.build()?;

        info!("Packaging...");
        cook.package()?;
        let package_info = cook.package_info()?;

        if !self.config.keep_build_folder {
            let build_folder = self.config.build_folder(profile.settings.build_type);
            if let Err(e) = fs::remove_dir_all(&build_folder) {
                warn!("Failed to remove build folder {}: {}", build_folder.display(), e);
            }
        }

        info!(
            "Cooked {} into {}",
            recipe.reference(),
            self.config.package_dir.display()
        );

        Ok(CookResult {
            package_dir: self.config.package_dir.clone(),
            options: cook.options,
            package_info,
            applied_patches: cook.applied_patches,
            pruned_debug_symbols: cook.pruned,
            log: cook.log,
            warnings: cook.warnings,
        })
    }

    /// Fetch and extract the sources for a version into the source folder
    ///
    /// The source folder is removed first, so re-running never mixes stale
    /// and fresh files.
    pub fn acquire(&self, version: &str) -> Result<PathBuf> {
        let record = self.registry.get(version)?;
        let archive = self.fetch_source(record)?;

        let source_folder = self.config.source_folder();
        if source_folder.exists() {
            debug!("Removing previous sources in {}", source_folder.display());
            fs::remove_dir_all(&source_folder)?;
        }
        fs::create_dir_all(&source_folder)?;

        extract_archive(&archive, &source_folder, record.strip_root)?;
        Ok(source_folder)
    }

    /// Fetch a source archive (with caching)
    pub fn fetch_source(&self, record: &SourceRecord) -> Result<PathBuf> {
        let checksum = normalize_sha256(&record.sha256)
            .map_err(|e| Error::AcquisitionError(format!("Bad checksum for {}: {}", record.url, e)))?;

        fs::create_dir_all(&self.config.download_cache)?;

        // Checksum-keyed, keeping the archive extension for extraction
        let cached_path = self
            .config
            .download_cache
            .join(format!("{}-{}", checksum, record.archive_filename()));

        if cached_path.exists() {
            debug!("Using cached source: {}", cached_path.display());
            if verify_file_checksum(&cached_path, &checksum)? {
                return Ok(cached_path);
            }
            warn!("Cached file checksum mismatch, re-downloading");
            fs::remove_file(&cached_path)?;
        }

        info!("Downloading: {}", record.url);
        download_file(&record.url, &cached_path)?;

        let actual = sha256_file(&cached_path)?;
        if actual != checksum {
            fs::remove_file(&cached_path)?;
            return Err(Error::AcquisitionError(format!(
                "Checksum mismatch for {}: expected {}, got {}",
                record.url, checksum, actual
            )));
        }

        Ok(cached_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::dependency::StaticDependencies;
    use crate::recipe::settings::{BuildType, CompilerKind, Os, Settings};
    use crate::recipe::options::OptionsRequest;

    fn kitchen(root: &std::path::Path, registry: SourceRegistry) -> Kitchen {
        Kitchen::new(
            KitchenConfig::in_dir(root),
            registry,
            Arc::new(StaticDependencies::new()),
        )
    }

    fn profile(kind: CompilerKind, version: &str, build_type: BuildType) -> Profile {
        Profile {
            settings: Settings::new(Os::Linux, kind, version, build_type),
            options: OptionsRequest::default(),
        }
    }

    #[test]
    fn test_configure_resolves_options() {
        let dir = tempfile::tempdir().unwrap();
        let kitchen = kitchen(dir.path(), SourceRegistry::default());
        let recipe = Recipe::ruy("cci.20201217");

        let (options, warnings) = kitchen
            .configure(&recipe, &profile(CompilerKind::Gcc, "9", BuildType::Release))
            .unwrap();
        assert!(warnings.is_empty());
        assert!(!options.shared);
        assert_eq!(options.fpic.as_bool(), Some(true));
    }

    #[test]
    fn test_unregistered_version_is_acquisition_error() {
        let dir = tempfile::tempdir().unwrap();
        let kitchen = kitchen(dir.path(), SourceRegistry::default());
        let err = kitchen.acquire("cci.20201217").unwrap_err();
        assert!(matches!(err, Error::AcquisitionError(_)));
        // Nothing was extracted
        assert!(!kitchen.config().source_folder().exists());
    }

    #[test]
    fn test_checksum_mismatch_is_acquisition_error() {
        let dir = tempfile::tempdir().unwrap();
        let upstream = dir.path().join("ruy.tar.gz");
        fs::write(&upstream, b"not really an archive").unwrap();

        let mut registry = SourceRegistry::default();
        registry.insert(
            "cci.20201217",
            SourceRecord {
                url: upstream.display().to_string(),
                sha256: "0".repeat(64),
                strip_root: true,
            },
        );

        let kitchen = kitchen(dir.path(), registry);
        let err = kitchen.acquire("cci.20201217").unwrap_err();
        assert!(matches!(err, Error::AcquisitionError(ref m) if m.contains("Checksum mismatch")));
        // The bad download is not kept in the cache
        assert_eq!(fs::read_dir(&kitchen.config().download_cache).unwrap().count(), 0);
    }

    #[test]
    fn test_validation_runs_before_anything_else() {
        let dir = tempfile::tempdir().unwrap();
        let kitchen = kitchen(dir.path(), SourceRegistry::default());
        let recipe = Recipe::ruy("cci.20201217");

        let err = kitchen
            .cook(&recipe, &profile(CompilerKind::Clang, "5", BuildType::Debug))
            .unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));
        assert!(!kitchen.config().download_cache.exists());
        assert!(!kitchen.config().source_folder().exists());
    }
}
