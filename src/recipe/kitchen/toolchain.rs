// src/recipe/kitchen/toolchain.rs

//! Generated CMake inputs: the meta-build wrapper, the toolchain file and
//! config files for resolved dependencies

use crate::error::{Error, Result};
use crate::recipe::dependency::DependencyInfo;
use crate::recipe::options::Options;
use crate::recipe::settings::{CppStd, Settings};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Toolchain filename inside the generators folder
pub const TOOLCHAIN_FILE: &str = "ruy_toolchain.cmake";

/// Build-system variables ruy's top-level script understands
pub const RUY_CACHE_VARIABLES: &[(&str, bool)] =
    &[("RUY_MINIMAL_BUILD", true), ("RUY_ENABLE_INSTALL", true)];

/// Wrapper script placed at the meta-build root
///
/// Loads each dependency's generated config before descending into the
/// sources, and puts its include and library folders on the search paths so
/// bare link names resolve.
pub fn wrapper_cmakelists(source_subfolder: &str, deps: &[DependencyInfo]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "cmake_minimum_required(VERSION 3.15)");
    let _ = writeln!(out, "project(cmake_wrapper)");
    let _ = writeln!(out);

    for dep in deps {
        let _ = writeln!(out, "find_package({} REQUIRED CONFIG)", dep.name);
        for dir in dep.include_paths() {
            let _ = writeln!(out, "include_directories(\"{}\")", cmake_path(&dir));
        }
        for dir in dep.lib_paths() {
            let _ = writeln!(out, "link_directories(\"{}\")", cmake_path(&dir));
        }
    }
    if !deps.is_empty() {
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "add_subdirectory({})", source_subfolder);
    out
}

fn on_off(value: bool) -> &'static str {
    if value { "ON" } else { "OFF" }
}

fn cmake_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Render the toolchain file
pub fn render_toolchain(
    settings: &Settings,
    options: &Options,
    generators_dir: &Path,
) -> Result<String> {
    let mut out = String::new();
    let _ = writeln!(out, "# Generated by ruy-recipe. Do not edit.");
    let _ = writeln!(
        out,
        "set(CMAKE_BUILD_TYPE \"{}\" CACHE STRING \"\" FORCE)",
        settings.build_type
    );
    let _ = writeln!(
        out,
        "set(BUILD_SHARED_LIBS {} CACHE BOOL \"\" FORCE)",
        on_off(options.shared)
    );

    if let Some(fpic) = options.fpic.as_bool() {
        let _ = writeln!(
            out,
            "set(CMAKE_POSITION_INDEPENDENT_CODE {} CACHE BOOL \"\" FORCE)",
            on_off(fpic)
        );
    }

    if let Some(cppstd) = &settings.compiler.cppstd {
        let std = CppStd::parse(cppstd)?;
        let _ = writeln!(out, "set(CMAKE_CXX_STANDARD {})", std.cmake_value());
        let _ = writeln!(
            out,
            "set(CMAKE_CXX_EXTENSIONS {})",
            on_off(std.gnu_extensions())
        );
        let _ = writeln!(out, "set(CMAKE_CXX_STANDARD_REQUIRED ON)");
    }

    for (name, value) in RUY_CACHE_VARIABLES {
        let _ = writeln!(out, "set({} {} CACHE BOOL \"\" FORCE)", name, on_off(*value));
    }

    let _ = writeln!(
        out,
        "list(PREPEND CMAKE_PREFIX_PATH \"{}\")",
        cmake_path(generators_dir)
    );

    Ok(out)
}

/// Render a `<name>-config.cmake` exposing `<name>::<name>`
pub fn render_dependency_config(dep: &DependencyInfo) -> String {
    let target = format!("{0}::{0}", dep.name);
    let include_dirs: Vec<String> = dep.include_paths().iter().map(|p| cmake_path(p)).collect();
    let lib_dirs: Vec<String> = dep.lib_paths().iter().map(|p| cmake_path(p)).collect();

    let mut out = String::new();
    let _ = writeln!(out, "# Generated by ruy-recipe for {} {}", dep.name, dep.version);
    let _ = writeln!(out, "if(NOT TARGET {})", target);
    let _ = writeln!(out, "  add_library({} INTERFACE IMPORTED)", target);

    for lib in &dep.libs {
        let var = format!("{}_{}_LIBRARY", dep.name, lib);
        let _ = writeln!(
            out,
            "  find_library({} NAMES {} PATHS \"{}\" NO_DEFAULT_PATH)",
            var,
            lib,
            lib_dirs.join("\" \"")
        );
        let _ = writeln!(
            out,
            "  set_property(TARGET {} APPEND PROPERTY INTERFACE_LINK_LIBRARIES \"${{{}}}\")",
            target, var
        );
    }

    for lib in &dep.system_libs {
        let _ = writeln!(
            out,
            "  set_property(TARGET {} APPEND PROPERTY INTERFACE_LINK_LIBRARIES {})",
            target, lib
        );
    }

    if !include_dirs.is_empty() {
        let _ = writeln!(
            out,
            "  set_property(TARGET {} PROPERTY INTERFACE_INCLUDE_DIRECTORIES \"{}\")",
            target,
            include_dirs.join(";")
        );
    }

    let _ = writeln!(out, "endif()");
    let _ = writeln!(out, "set({}_FOUND TRUE)", dep.name);
    let _ = writeln!(out, "set({}_VERSION \"{}\")", dep.name, dep.version);
    out
}

/// Write every generated file; returns the toolchain file path
pub fn generate(
    recipe_root: &Path,
    source_subfolder: &str,
    generators_dir: &Path,
    settings: &Settings,
    options: &Options,
    deps: &[DependencyInfo],
) -> Result<PathBuf> {
    fs::create_dir_all(generators_dir)?;

    write_file(
        &recipe_root.join("CMakeLists.txt"),
        &wrapper_cmakelists(source_subfolder, deps),
    )?;

    let toolchain_path = generators_dir.join(TOOLCHAIN_FILE);
    write_file(
        &toolchain_path,
        &render_toolchain(settings, options, generators_dir)?,
    )?;

    for dep in deps {
        let path = generators_dir.join(format!("{}-config.cmake", dep.name));
        write_file(&path, &render_dependency_config(dep))?;
    }

    Ok(toolchain_path)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| Error::IoError(format!("Failed to write {}: {}", path.display(), e)))?;
    debug!("Generated {}", path.display());
    Ok(())
}
