// src/cli.rs
//! CLI definitions for ruy-recipe
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "ruy-recipe")]
#[command(author = "ruy-recipe contributors")]
#[command(version)]
#[command(about = "Build and package the ruy matrix multiplication library", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Arguments shared by every command that works on a profile
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Recipe version to build (e.g., cci.20201217)
    #[arg(short = 'v', long = "recipe-version", default_value = "cci.20201217")]
    pub version: String,

    /// Path to the build profile (TOML)
    #[arg(short, long)]
    pub profile: String,
}

/// Arguments for commands that touch the working folders
#[derive(Args, Debug, Clone)]
pub struct KitchenArgs {
    /// Source registry (TOML mapping versions to archives)
    #[arg(short, long, default_value = "sources.toml")]
    pub sources: String,

    /// Recipe root: receives src/, build/ and the wrapper CMakeLists.txt
    #[arg(short, long, default_value = ".")]
    pub root: String,

    /// Download cache directory (default: <root>/downloads)
    #[arg(long)]
    pub download_cache: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a profile and show the resolved options
    Validate {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Fetch, verify and extract the sources only
    Source {
        #[command(flatten)]
        profile: ProfileArgs,

        #[command(flatten)]
        kitchen: KitchenArgs,
    },

    /// Build and package ruy
    Create {
        #[command(flatten)]
        profile: ProfileArgs,

        #[command(flatten)]
        kitchen: KitchenArgs,

        /// Dependency descriptions (TOML)
        #[arg(short, long, default_value = "deps.toml")]
        deps: String,

        /// Package output directory (default: <root>/package)
        #[arg(short, long)]
        output: Option<String>,

        /// CMake executable (default: cmake found on PATH)
        #[arg(long)]
        cmake: Option<String>,

        /// Number of parallel build jobs
        #[arg(short, long)]
        jobs: Option<u32>,

        /// Keep the build folder after packaging
        #[arg(long)]
        keep_build_folder: bool,
    },

    /// Print the declared package info for a profile as JSON
    Info {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
