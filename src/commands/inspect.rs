// src/commands/inspect.rs

//! Validate and info commands - inspect a profile without building

use super::load_profile;
use crate::cli::ProfileArgs;
use anyhow::{Context, Result};
use ruy_recipe::recipe::{Options, PackageInfo, validate};

/// Validate a profile and print the resolved options
pub fn cmd_validate(args: &ProfileArgs) -> Result<()> {
    let (recipe, profile) = load_profile(args)?;
    let settings = &profile.settings;

    println!("Recipe: {}", recipe.reference());
    println!(
        "Profile: {} {} {} {} ({})",
        settings.os, settings.compiler.name, settings.compiler.version, settings.build_type, settings.arch
    );

    let warnings = validate(settings, &recipe.version).with_context(|| "Validation failed")?;
    for warning in &warnings {
        println!("Warning: {}", warning);
    }

    let options = Options::resolve(settings, &profile.options);
    println!("Options:");
    println!("  shared: {}", options.shared);
    println!("  fPIC: {}", options.fpic);

    if warnings.is_empty() {
        println!("[OK] No issues found");
    } else {
        println!("[OK] {} warning(s)", warnings.len());
    }
    Ok(())
}

/// Print the declared package info for a profile as JSON
pub fn cmd_info(args: &ProfileArgs) -> Result<()> {
    let (recipe, profile) = load_profile(args)?;

    validate(&profile.settings, &recipe.version).with_context(|| "Validation failed")?;

    let info = PackageInfo::for_ruy(&recipe.reference(), &profile.settings.os);
    let json = serde_json::to_string_pretty(&info).context("Failed to serialize package info")?;
    println!("{}", json);
    Ok(())
}
