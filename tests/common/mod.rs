// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::GzEncoder;
use ruy_recipe::hash::sha256_file;
use ruy_recipe::recipe::settings::{BuildType, CompilerKind, Os, Settings};
use ruy_recipe::recipe::{
    BuildTool, ConfigureArgs, DependencyInfo, Kitchen, KitchenConfig, OptionsRequest, Profile,
    SourceRecord, SourceRegistry, StaticDependencies, StepOutput,
};
use ruy_recipe::{Error, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Stock text of ruy's library helper script
pub const CC_LIBRARY_SCRIPT: &str = "\
function(ruy_cc_library)
  file(RELATIVE_PATH _SUBDIR ${CMAKE_SOURCE_DIR} ${CMAKE_CURRENT_LIST_DIR})
  if(_RULE_HDRS_ONLY)
    add_library(${_NAME} INTERFACE)
  else()
    add_library(${_NAME} STATIC ${_RULE_SRCS} ${_RULE_HDRS})
  endif()
endfunction()
";

/// Stock ruy/CMakeLists.txt for a snapshot before the cpuinfo target rename
pub const OLD_RUY_CMAKELISTS: &str = "\
set(ruy_0_Wall \"-Wall\")
set(ruy_6_cpuinfo \"cpuinfo\")
ruy_cc_library(NAME ruy_cpuinfo DEPS ${ruy_6_cpuinfo})
";

/// Stock ruy/CMakeLists.txt for a snapshot after the cpuinfo target rename
pub const NEW_RUY_CMAKELISTS: &str = "\
set(ruy_0_Wall \"-Wall\")
set(ruy_6_cpuinfo_cpuinfo \"cpuinfo::cpuinfo\")
ruy_cc_library(NAME ruy_cpuinfo DEPS ${ruy_6_cpuinfo_cpuinfo})
";

/// Write a gzipped tarball with every file under a single root directory
pub fn write_tarball(path: &Path, root: &str, files: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("{}/{}", root, name), content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

/// Files of an upstream ruy snapshot
pub fn ruy_source_files(ruy_cmakelists: &'static str, with_license: bool) -> Vec<(&'static str, &'static str)> {
    let mut files = vec![
        ("CMakeLists.txt", "project(ruy CXX)\nadd_subdirectory(ruy)\n"),
        ("cmake/ruy_cc_library.cmake", CC_LIBRARY_SCRIPT),
        ("ruy/CMakeLists.txt", ruy_cmakelists),
    ];
    if with_license {
        files.push(("LICENSE", "Apache License\nVersion 2.0, January 2004\n"));
    }
    files
}

/// Which step of the fake build tool should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Nothing,
    Configure,
    Build,
    Install,
}

/// Build tool stand-in that records its calls and fakes an install
pub struct RecordingBuildTool {
    pub calls: Mutex<Vec<String>>,
    pub fail_at: FailAt,
    /// Whether install leaves `.pdb` files behind
    pub emit_debug_symbols: bool,
}

impl RecordingBuildTool {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_at: FailAt::Nothing,
            emit_debug_symbols: true,
        }
    }

    pub fn failing_at(step: FailAt) -> Self {
        Self {
            fail_at: step,
            ..Self::new()
        }
    }

    pub fn without_debug_symbols() -> Self {
        Self {
            emit_debug_symbols: false,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, step: &str, fail: FailAt) -> Result<()> {
        self.calls.lock().unwrap().push(step.to_string());
        if self.fail_at == fail {
            return Err(Error::BuildError {
                step: step.to_string(),
                status: "exit status: 1".to_string(),
                stderr: format!("CMake Error: {} failed", step),
            });
        }
        Ok(())
    }
}

impl BuildTool for RecordingBuildTool {
    fn configure(&self, args: &ConfigureArgs) -> Result<StepOutput> {
        self.record("configure", FailAt::Configure)?;
        assert!(args.toolchain_file.exists(), "toolchain file must exist before configure");
        fs::create_dir_all(&args.build_dir)?;
        Ok(StepOutput {
            stdout: "-- Configuring done".to_string(),
            stderr: String::new(),
        })
    }

    fn build(&self, _build_dir: &Path, _build_type: BuildType, _jobs: u32) -> Result<StepOutput> {
        self.record("build", FailAt::Build)?;
        Ok(StepOutput {
            stdout: "[100%] Built target ruy_frontend".to_string(),
            stderr: String::new(),
        })
    }

    fn install(&self, _build_dir: &Path, _build_type: BuildType, prefix: &Path) -> Result<StepOutput> {
        self.record("install", FailAt::Install)?;
        let lib_dir = prefix.join("lib");
        let include_dir = prefix.join("include/ruy");
        fs::create_dir_all(&lib_dir)?;
        fs::create_dir_all(&include_dir)?;
        fs::write(include_dir.join("ruy.h"), "// ruy\n")?;
        fs::write(lib_dir.join("libruy_frontend.a"), "!<arch>\n")?;
        if self.emit_debug_symbols {
            fs::write(lib_dir.join("ruy_frontend.pdb"), "pdb")?;
            fs::write(prefix.join("vc140.pdb"), "pdb")?;
        }
        Ok(StepOutput::default())
    }
}

/// A self-contained working area: upstream archive, registry, dependencies
pub struct Fixture {
    pub dir: TempDir,
    pub registry: SourceRegistry,
    pub deps: StaticDependencies,
}

impl Fixture {
    /// Register `version` with an archive holding `files`
    pub fn new(version: &str, files: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let upstream = dir.path().join("upstream");
        fs::create_dir_all(&upstream).unwrap();

        let archive = upstream.join(format!("ruy-{}.tar.gz", version));
        write_tarball(&archive, "ruy-4bdb31ab", files);
        let sha256 = sha256_file(&archive).unwrap();

        let mut registry = SourceRegistry::default();
        registry.insert(
            version,
            SourceRecord {
                url: format!("file://{}", archive.display()),
                sha256,
                strip_root: true,
            },
        );

        let cpuinfo_root = dir.path().join("deps/cpuinfo");
        fs::create_dir_all(cpuinfo_root.join("lib")).unwrap();
        let mut deps = StaticDependencies::new();
        deps.insert(DependencyInfo {
            name: "cpuinfo".to_string(),
            version: "cci.20201217".to_string(),
            root: cpuinfo_root,
            libs: vec!["cpuinfo".to_string(), "clog".to_string()],
            system_libs: vec!["pthread".to_string()],
            include_dirs: vec!["include".to_string()],
            lib_dirs: vec!["lib".to_string()],
        });

        Self { dir, registry, deps }
    }

    /// Working folder handed to the kitchen
    pub fn root(&self) -> PathBuf {
        self.dir.path().join("work")
    }

    pub fn config(&self) -> KitchenConfig {
        KitchenConfig::in_dir(&self.root())
    }

    pub fn kitchen(&self, tool: Arc<RecordingBuildTool>) -> Kitchen {
        self.kitchen_with(self.config(), tool)
    }

    pub fn kitchen_with(&self, config: KitchenConfig, tool: Arc<RecordingBuildTool>) -> Kitchen {
        Kitchen::new(config, self.registry.clone(), Arc::new(self.deps.clone()))
            .with_build_tool(tool)
    }
}

/// Profile for a compiler on an OS, static by default
pub fn profile(os: Os, compiler: CompilerKind, version: &str, build_type: BuildType) -> Profile {
    Profile {
        settings: Settings::new(os, compiler, version, build_type),
        options: OptionsRequest::default(),
    }
}
