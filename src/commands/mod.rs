// src/commands/mod.rs
//! Command handlers for the ruy-recipe CLI

mod cook;
mod inspect;

pub use cook::{cmd_create, cmd_source};
pub use inspect::{cmd_info, cmd_validate};

use crate::cli::{KitchenArgs, ProfileArgs};
use anyhow::{Context, Result};
use ruy_recipe::recipe::{
    DependencyProvider, Kitchen, KitchenConfig, Profile, Recipe, StaticDependencies,
    parse_profile_file, parse_source_registry_file,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Load the recipe and profile named on the command line
fn load_profile(args: &ProfileArgs) -> Result<(Recipe, Profile)> {
    let path = Path::new(&args.profile);
    let profile = parse_profile_file(path)
        .with_context(|| format!("Failed to parse profile: {}", path.display()))?;
    Ok((Recipe::ruy(&args.version), profile))
}

/// Build a kitchen from the command line's folder and registry arguments
fn open_kitchen(
    args: &KitchenArgs,
    provider: Arc<dyn DependencyProvider>,
    adjust: impl FnOnce(&mut KitchenConfig),
) -> Result<Kitchen> {
    let sources = Path::new(&args.sources);
    let registry = parse_source_registry_file(sources)
        .with_context(|| format!("Failed to read source registry: {}", sources.display()))?;

    let mut config = KitchenConfig::in_dir(Path::new(&args.root));
    if let Some(cache) = &args.download_cache {
        config.download_cache = PathBuf::from(cache);
    }
    adjust(&mut config);

    Ok(Kitchen::new(config, registry, provider))
}

/// Provider for commands that never resolve requirements
fn no_dependencies() -> Arc<dyn DependencyProvider> {
    Arc::new(StaticDependencies::new())
}
