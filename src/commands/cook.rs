// src/commands/cook.rs

//! Source and create commands - acquire sources, build and package ruy

use super::{load_profile, no_dependencies, open_kitchen};
use crate::cli::{KitchenArgs, ProfileArgs};
use anyhow::{Context, Result};
use ruy_recipe::recipe::{parse_dependencies_file, validate};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Fetch, verify and extract sources without building
pub fn cmd_source(profile_args: &ProfileArgs, kitchen_args: &KitchenArgs) -> Result<()> {
    let (recipe, profile) = load_profile(profile_args)?;

    // A rejected configuration never downloads anything
    validate(&profile.settings, &recipe.version)
        .with_context(|| format!("Invalid configuration for {}", recipe.reference()))?;

    let kitchen = open_kitchen(kitchen_args, no_dependencies(), |_| {})?;

    println!("Fetching sources for {}...", recipe.reference());
    let source_folder = kitchen
        .acquire(&recipe.version)
        .with_context(|| format!("Failed to acquire sources for {}", recipe.reference()))?;

    println!("\n[COMPLETE] Sources extracted to {}", source_folder.display());
    Ok(())
}

/// Run the full pipeline for a profile
#[allow(clippy::too_many_arguments)]
pub fn cmd_create(
    profile_args: &ProfileArgs,
    kitchen_args: &KitchenArgs,
    deps_path: &str,
    output: Option<&str>,
    cmake: Option<&str>,
    jobs: Option<u32>,
    keep_build_folder: bool,
) -> Result<()> {
    let (recipe, profile) = load_profile(profile_args)?;

    let deps_path = Path::new(deps_path);
    let deps = parse_dependencies_file(deps_path)
        .with_context(|| format!("Failed to read dependencies: {}", deps_path.display()))?;

    let kitchen = open_kitchen(kitchen_args, Arc::new(deps), |config| {
        if let Some(dir) = output {
            config.package_dir = PathBuf::from(dir);
        }
        if let Some(program) = cmake {
            config.cmake = Some(PathBuf::from(program));
        }
        if let Some(j) = jobs {
            config.jobs = j;
        }
        config.keep_build_folder = keep_build_folder;
    })?;

    println!(
        "Cooking {} with {} parallel jobs...",
        recipe.reference(),
        kitchen.config().jobs
    );

    let result = kitchen
        .cook(&recipe, &profile)
        .with_context(|| format!("Failed to create {}", recipe.reference()))?;

    println!("\n[COMPLETE] Packaged: {}", result.package_dir.display());
    println!("  shared: {}", result.options.shared);
    println!("  fPIC: {}", result.options.fpic);
    println!("  Libraries: {}", result.package_info.libs.len());
    if !result.package_info.system_libs.is_empty() {
        println!(
            "  System libraries: {}",
            result.package_info.system_libs.join(", ")
        );
    }
    for patch in &result.applied_patches {
        println!("  Patched: {}", patch);
    }
    if result.pruned_debug_symbols > 0 {
        println!("  Removed {} debug symbol file(s)", result.pruned_debug_symbols);
    }

    if !result.warnings.is_empty() {
        println!("\nBuild warnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }

    info!(
        "Successfully created {} in {}",
        recipe.reference(),
        result.package_dir.display()
    );

    Ok(())
}
