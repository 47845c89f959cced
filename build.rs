// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe version
fn version_arg() -> Arg {
    Arg::new("recipe_version")
        .short('v')
        .long("recipe-version")
        .value_name("VERSION")
        .default_value("cci.20201217")
        .help("Recipe version to build")
}

/// Common argument: build profile
fn profile_arg() -> Arg {
    Arg::new("profile")
        .short('p')
        .long("profile")
        .value_name("PATH")
        .required(true)
        .help("Path to the build profile (TOML)")
}

/// Common argument: source registry
fn sources_arg() -> Arg {
    Arg::new("sources")
        .short('s')
        .long("sources")
        .value_name("PATH")
        .default_value("sources.toml")
        .help("Source registry (TOML mapping versions to archives)")
}

/// Common argument: download cache
fn download_cache_arg() -> Arg {
    Arg::new("download_cache")
        .long("download-cache")
        .value_name("PATH")
        .help("Download cache directory (default: <root>/downloads)")
}

/// Common argument: recipe root
fn root_arg() -> Arg {
    Arg::new("root")
        .short('r')
        .long("root")
        .default_value(".")
        .help("Recipe root: receives src/, build/ and the wrapper CMakeLists.txt")
}

fn build_cli() -> Command {
    Command::new("ruy-recipe")
        .version(env!("CARGO_PKG_VERSION"))
        .author("ruy-recipe Contributors")
        .about("Build and package the ruy matrix multiplication library")
        .subcommand_required(false)
        .subcommand(
            Command::new("validate")
                .about("Validate a profile and show the resolved options")
                .arg(version_arg())
                .arg(profile_arg()),
        )
        .subcommand(
            Command::new("source")
                .about("Fetch, verify and extract the sources only")
                .arg(version_arg())
                .arg(profile_arg())
                .arg(sources_arg())
                .arg(root_arg())
                .arg(download_cache_arg()),
        )
        .subcommand(
            Command::new("create")
                .about("Build and package ruy")
                .arg(version_arg())
                .arg(profile_arg())
                .arg(sources_arg())
                .arg(root_arg())
                .arg(download_cache_arg())
                .arg(
                    Arg::new("deps")
                        .short('d')
                        .long("deps")
                        .default_value("deps.toml")
                        .help("Dependency descriptions (TOML)"),
                )
                .arg(Arg::new("output").short('o').long("output").help("Package output directory"))
                .arg(Arg::new("cmake").long("cmake").help("CMake executable"))
                .arg(Arg::new("jobs").short('j').long("jobs").help("Number of parallel build jobs"))
                .arg(
                    Arg::new("keep_build_folder")
                        .long("keep-build-folder")
                        .action(clap::ArgAction::SetTrue)
                        .help("Keep the build folder after packaging"),
                ),
        )
        .subcommand(
            Command::new("info")
                .about("Print the declared package info for a profile as JSON")
                .arg(version_arg())
                .arg(profile_arg()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell", "elvish"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("ruy-recipe.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
