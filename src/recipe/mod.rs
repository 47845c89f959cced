// src/recipe/mod.rs

//! Recipe for building ruy from source
//!
//! The recipe turns a caller's build profile into an installed, packaged
//! ruy library:
//! - Validates the compiler and build type against ruy's C++14 needs
//! - Resolves platform-conditional options (`shared`, `fPIC`)
//! - Fetches and verifies the upstream snapshot archive
//! - Patches ruy's vendored CMake scripts for the chosen configuration
//! - Configures, builds and installs with CMake
//! - Declares the libraries consumers must link
//!
//! # Culinary Terminology
//!
//! - **Recipe**: What to build: metadata plus a version
//! - **Kitchen**: The working folders, source registry and build tool
//! - **Cook**: One run of the pipeline for one profile
//!
//! # Example Profile
//!
//! ```toml
//! [settings]
//! os = "Linux"
//! arch = "x86_64"
//! build_type = "Release"
//!
//! [settings.compiler]
//! name = "gcc"
//! version = "9"
//!
//! [options]
//! shared = false
//! fPIC = true
//! ```

pub mod dependency;
mod format;
mod kitchen;
pub mod options;
pub mod package_info;
pub mod parser;
pub mod patch;
pub mod settings;
pub mod validate;

pub use dependency::{DependencyInfo, DependencyProvider, StaticDependencies};
pub use format::{
    Profile, RUY_METADATA, Recipe, RecipeMetadata, Requirement, SourceRecord, SourceRegistry,
};
pub use kitchen::{
    BuildTool, CMake, ConfigureArgs, CookResult, Kitchen, KitchenConfig, SOURCE_SUBFOLDER,
    StepOutput,
};
pub use options::{OptionValue, Options, OptionsRequest};
pub use package_info::{PACKAGE_MANIFEST, PackageInfo, RUY_LIBS};
pub use parser::{
    parse_dependencies, parse_dependencies_file, parse_profile, parse_profile_file,
    parse_source_registry, parse_source_registry_file,
};
pub use settings::{BuildType, CompilerKind, CompilerSettings, Os, Settings};
pub use validate::validate;
