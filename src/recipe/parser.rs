// src/recipe/parser.rs

//! Parsing of the caller-supplied TOML documents: build profiles, source
//! registries and dependency descriptions

use crate::error::{Error, Result};
use crate::recipe::dependency::StaticDependencies;
use crate::recipe::format::{Profile, SourceRegistry};
use std::path::Path;

fn read_file(path: &Path, what: &str) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read {} file {}: {}", what, path.display(), e)))
}

/// Parse a build profile from a TOML string
///
/// Only the document shape is checked here. Compiler versions and C++
/// standards are judged during validation.
pub fn parse_profile(content: &str) -> Result<Profile> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid profile: {}", e)))
}

/// Parse a build profile from a file
pub fn parse_profile_file(path: &Path) -> Result<Profile> {
    parse_profile(&read_file(path, "profile")?)
}

/// Parse a source registry from a TOML string
pub fn parse_source_registry(content: &str) -> Result<SourceRegistry> {
    let registry: SourceRegistry = toml::from_str(content)
        .map_err(|e| Error::ParseError(format!("Invalid source registry: {}", e)))?;

    for (version, record) in &registry.sources {
        if record.url.is_empty() {
            return Err(Error::ParseError(format!(
                "Source for {} has an empty url",
                version
            )));
        }
    }

    Ok(registry)
}

/// Parse a source registry from a file
pub fn parse_source_registry_file(path: &Path) -> Result<SourceRegistry> {
    parse_source_registry(&read_file(path, "source registry")?)
}

/// Parse dependency descriptions from a TOML string
///
/// Relative roots are resolved against `base_dir`.
pub fn parse_dependencies(content: &str, base_dir: &Path) -> Result<StaticDependencies> {
    let mut deps: StaticDependencies = toml::from_str(content)
        .map_err(|e| Error::ParseError(format!("Invalid dependencies: {}", e)))?;
    deps.normalize(base_dir);
    Ok(deps)
}

/// Parse dependency descriptions from a file
///
/// Relative roots are resolved against the file's directory.
pub fn parse_dependencies_file(path: &Path) -> Result<StaticDependencies> {
    let content = read_file(path, "dependencies")?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_dependencies(&content, base_dir)
}
