// src/recipe/kitchen/cook.rs

//! Cook: the actual build execution for one recipe and profile

use crate::error::{Error, Result};
use crate::recipe::dependency::DependencyInfo;
use crate::recipe::format::{Profile, Recipe};
use crate::recipe::options::Options;
use crate::recipe::package_info::PackageInfo;
use crate::recipe::patch::{self, PatchRule};
use crate::recipe::validate::validate;
use crate::version::SnapshotVersion;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::Kitchen;
use super::archive::remove_matching;
use super::cmake::{ConfigureArgs, StepOutput};
use super::config::SOURCE_SUBFOLDER;
use super::toolchain;

/// Debug symbol files pruned from the package
const DEBUG_SYMBOL_PATTERN: &str = "*.pdb";

/// License file copied into `<package>/licenses`
const LICENSE_FILE: &str = "LICENSE";

/// A single cook operation
pub struct Cook<'a> {
    pub(super) kitchen: &'a Kitchen,
    pub(super) recipe: &'a Recipe,
    pub(super) profile: &'a Profile,
    /// Parsed recipe version
    pub(super) snapshot: SnapshotVersion,
    /// Options after resolution
    pub(super) options: Options,
    /// Resolved requirements
    pub(super) deps: Vec<DependencyInfo>,
    /// Generated toolchain file
    pub(super) toolchain_file: Option<PathBuf>,
    /// Names of applied patches
    pub(super) applied_patches: Vec<String>,
    /// Debug symbol files removed from the package
    pub(super) pruned: usize,
    /// Build log accumulator
    pub(super) log: String,
    /// Warnings
    pub(super) warnings: Vec<String>,
}

impl<'a> Cook<'a> {
    /// Validate the configuration and resolve options
    ///
    /// Nothing touches the filesystem until this has succeeded.
    pub(super) fn new(kitchen: &'a Kitchen, recipe: &'a Recipe, profile: &'a Profile) -> Result<Self> {
        let warnings = validate(&profile.settings, &recipe.version)?;
        let snapshot = SnapshotVersion::parse(&recipe.version)?;
        let options = Options::resolve(&profile.settings, &profile.options);

        debug!("Resolved options: shared={} fPIC={}", options.shared, options.fpic);

        let mut cook = Self {
            kitchen,
            recipe,
            profile,
            snapshot,
            options,
            deps: Vec::new(),
            toolchain_file: None,
            applied_patches: Vec::new(),
            pruned: 0,
            log: String::new(),
            warnings,
        };
        cook.log_line(&format!(
            "Configuration: {} {} {} {} (shared={}, fPIC={})",
            profile.settings.os,
            profile.settings.compiler.name,
            profile.settings.compiler.version,
            profile.settings.build_type,
            options.shared,
            options.fpic
        ));
        Ok(cook)
    }

    /// Resolve declared requirements through the kitchen's provider
    pub(super) fn requirements(&mut self) -> Result<()> {
        for requirement in self.recipe.requirements()? {
            let info = self.kitchen.provider.resolve(&requirement)?;
            if info.version != requirement.version {
                self.warnings.push(format!(
                    "{} resolved to version {}",
                    requirement, info.version
                ));
            }
            self.log_line(&format!("Requirement {} -> {}", requirement, info.root.display()));
            self.deps.push(info);
        }
        Ok(())
    }

    /// Acquire the upstream sources
    pub(super) fn source(&mut self) -> Result<()> {
        let source_folder = self.kitchen.acquire(&self.recipe.version)?;
        self.log_line(&format!("Extracted source to {}", source_folder.display()));
        Ok(())
    }

    /// Write the wrapper, toolchain and dependency config files
    pub(super) fn generate(&mut self) -> Result<()> {
        let kitchen = self.kitchen;
        let config = &kitchen.config;
        let build_type = self.profile.settings.build_type;

        let toolchain_file = toolchain::generate(
            &config.recipe_root,
            SOURCE_SUBFOLDER,
            &config.generators_folder(build_type),
            &self.profile.settings,
            &self.options,
            &self.deps,
        )?;

        self.log_line(&format!("Generated toolchain {}", toolchain_file.display()));
        self.toolchain_file = Some(toolchain_file);
        Ok(())
    }

    /// Patch rules for this cook
    pub(super) fn patch_rules(&self) -> Result<Vec<PatchRule>> {
        let cpuinfo = self
            .deps
            .iter()
            .find(|d| d.name == "cpuinfo")
            .ok_or_else(|| Error::DependencyError("cpuinfo was not resolved".to_string()))?;

        Ok(patch::ruy_patches(self.snapshot, SOURCE_SUBFOLDER, cpuinfo))
    }

    /// Apply the patch rules to the extracted sources
    pub(super) fn patch(&mut self) -> Result<()> {
        let source_folder = self.kitchen.config.source_folder();
        for rule in self.patch_rules()? {
            rule.apply(&source_folder)?;
            self.log_line(&format!("Applied patch: {}", rule.name));
            self.applied_patches.push(rule.name);
        }
        Ok(())
    }

    /// Configure and build with the build tool
    pub(super) fn build(&mut self) -> Result<()> {
        let kitchen = self.kitchen;
        let config = &kitchen.config;
        let build_type = self.profile.settings.build_type;
        let toolchain_file = self.toolchain_file.clone().ok_or_else(|| {
            Error::BuildError {
                step: "configure".to_string(),
                status: "not generated".to_string(),
                stderr: "toolchain file was not generated".to_string(),
            }
        })?;

        let tool = kitchen.build_tool()?;
        let args = ConfigureArgs {
            source_dir: config.recipe_root.clone(),
            build_dir: config.build_folder(build_type),
            toolchain_file,
            build_type,
        };

        let output = tool.configure(&args)?;
        self.log_build_output("configure", &output);

        let output = tool.build(&args.build_dir, build_type, config.jobs)?;
        self.log_build_output("build", &output);

        Ok(())
    }

    /// Install, copy the license, prune debug symbols
    pub(super) fn package(&mut self) -> Result<()> {
        let kitchen = self.kitchen;
        let config = &kitchen.config;
        let build_type = self.profile.settings.build_type;
        let package_dir = config.package_dir.clone();

        // Only this run's artifacts end up in the package
        if package_dir.exists() {
            debug!("Removing previous package in {}", package_dir.display());
            fs::remove_dir_all(&package_dir)?;
        }
        fs::create_dir_all(&package_dir)?;

        let tool = kitchen.build_tool()?;
        let output = tool.install(&config.build_folder(build_type), build_type, &package_dir)?;
        self.log_build_output("install", &output);

        let license = config.source_folder().join(LICENSE_FILE);
        if license.is_file() {
            let licenses_dir = package_dir.join("licenses");
            fs::create_dir_all(&licenses_dir)?;
            fs::copy(&license, licenses_dir.join(LICENSE_FILE))?;
            self.log_line("Copied LICENSE to licenses/");
        } else {
            let msg = format!("No {} found in {}", LICENSE_FILE, config.source_folder().display());
            warn!("{}", msg);
            self.warnings.push(msg);
        }

        self.pruned = remove_matching(&package_dir, DEBUG_SYMBOL_PATTERN)?;
        if self.pruned > 0 {
            info!("Removed {} debug symbol file(s)", self.pruned);
        }
        self.log_line(&format!("Pruned {} {} file(s)", self.pruned, DEBUG_SYMBOL_PATTERN));

        Ok(())
    }

    /// Declare the link surface and write it to the package
    pub(super) fn package_info(&mut self) -> Result<PackageInfo> {
        let info = PackageInfo::for_ruy(&self.recipe.reference(), &self.profile.settings.os);
        let path = info.write(&self.kitchen.config.package_dir)?;
        self.log_line(&format!(
            "Declared {} libraries and {} system libraries in {}",
            info.libs.len(),
            info.system_libs.len(),
            path.display()
        ));
        Ok(info)
    }

    fn log_line(&mut self, line: &str) {
        self.log.push_str(line);
        self.log.push('\n');
    }

    /// Log build step output (stdout/stderr) with a step header
    fn log_build_output(&mut self, step: &str, output: &StepOutput) {
        self.log_line(&format!("=== {} ===", step));
        if !output.stdout.is_empty() {
            self.log.push_str(&output.stdout);
            self.log.push('\n');
        }
        if !output.stderr.is_empty() {
            self.log.push_str(&output.stderr);
            self.log.push('\n');
        }
    }
}
