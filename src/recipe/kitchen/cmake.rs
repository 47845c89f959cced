// src/recipe/kitchen/cmake.rs

//! Driving the underlying build system
//!
//! The Kitchen talks to CMake through the [`BuildTool`] trait so the rest of
//! the pipeline can run against a stand-in during tests.

use crate::error::{Error, Result};
use crate::recipe::settings::BuildType;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Arguments for the configure step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureArgs {
    /// Directory holding the top-level CMakeLists.txt
    pub source_dir: PathBuf,
    /// Binary directory
    pub build_dir: PathBuf,
    /// Generated toolchain file
    pub toolchain_file: PathBuf,
    /// Build type
    pub build_type: BuildType,
}

/// Output captured from a build tool step
#[derive(Debug, Clone, Default)]
pub struct StepOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Trait for the meta-build tool
pub trait BuildTool: Send + Sync {
    /// Generate the build tree
    fn configure(&self, args: &ConfigureArgs) -> Result<StepOutput>;

    /// Compile
    fn build(&self, build_dir: &Path, build_type: BuildType, jobs: u32) -> Result<StepOutput>;

    /// Install into `prefix`
    fn install(&self, build_dir: &Path, build_type: BuildType, prefix: &Path) -> Result<StepOutput>;
}

/// CMake invoked as an external process
#[derive(Debug, Clone)]
pub struct CMake {
    program: PathBuf,
}

impl CMake {
    /// Use a specific cmake executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Find `cmake` on PATH
    pub fn discover() -> Result<Self> {
        let program = which::which("cmake").map_err(|e| Error::BuildError {
            step: "discover".to_string(),
            status: "not found".to_string(),
            stderr: format!("cmake not found in PATH: {}", e),
        })?;
        debug!("Using cmake at {}", program.display());
        Ok(Self::new(program))
    }

    /// Path of the executable
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Command line for the configure step
    pub fn configure_command(args: &ConfigureArgs) -> Vec<String> {
        vec![
            "-S".to_string(),
            args.source_dir.to_string_lossy().to_string(),
            "-B".to_string(),
            args.build_dir.to_string_lossy().to_string(),
            format!("-DCMAKE_TOOLCHAIN_FILE={}", args.toolchain_file.display()),
            format!("-DCMAKE_BUILD_TYPE={}", args.build_type),
        ]
    }

    /// Command line for the build step
    pub fn build_command(build_dir: &Path, build_type: BuildType, jobs: u32) -> Vec<String> {
        vec![
            "--build".to_string(),
            build_dir.to_string_lossy().to_string(),
            "--config".to_string(),
            build_type.as_str().to_string(),
            "--parallel".to_string(),
            jobs.to_string(),
        ]
    }

    /// Command line for the install step
    pub fn install_command(build_dir: &Path, build_type: BuildType, prefix: &Path) -> Vec<String> {
        vec![
            "--install".to_string(),
            build_dir.to_string_lossy().to_string(),
            "--config".to_string(),
            build_type.as_str().to_string(),
            "--prefix".to_string(),
            prefix.to_string_lossy().to_string(),
        ]
    }

    fn run(&self, step: &str, args: &[String]) -> Result<StepOutput> {
        info!("Running {} step", step);
        debug!("Command: {} {}", self.program.display(), args.join(" "));

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| Error::BuildError {
                step: step.to_string(),
                status: "spawn failure".to_string(),
                stderr: e.to_string(),
            })?;

        let captured = StepOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if !output.status.success() {
            return Err(Error::BuildError {
                step: step.to_string(),
                status: output.status.to_string(),
                stderr: captured.stderr,
            });
        }

        Ok(captured)
    }
}

impl BuildTool for CMake {
    fn configure(&self, args: &ConfigureArgs) -> Result<StepOutput> {
        self.run("configure", &Self::configure_command(args))
    }

    fn build(&self, build_dir: &Path, build_type: BuildType, jobs: u32) -> Result<StepOutput> {
        self.run("build", &Self::build_command(build_dir, build_type, jobs))
    }

    fn install(&self, build_dir: &Path, build_type: BuildType, prefix: &Path) -> Result<StepOutput> {
        self.run("install", &Self::install_command(build_dir, build_type, prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_command() {
        let args = ConfigureArgs {
            source_dir: PathBuf::from("/work/ruy"),
            build_dir: PathBuf::from("/work/ruy/build/Release"),
            toolchain_file: PathBuf::from("/work/ruy/build/Release/generators/ruy_toolchain.cmake"),
            build_type: BuildType::Release,
        };
        let cmd = CMake::configure_command(&args);
        assert_eq!(cmd[0..4], ["-S", "/work/ruy", "-B", "/work/ruy/build/Release"]);
        assert!(cmd.contains(
            &"-DCMAKE_TOOLCHAIN_FILE=/work/ruy/build/Release/generators/ruy_toolchain.cmake"
                .to_string()
        ));
        assert!(cmd.contains(&"-DCMAKE_BUILD_TYPE=Release".to_string()));
    }

    #[test]
    fn test_build_and_install_commands() {
        let build = CMake::build_command(Path::new("/b"), BuildType::Debug, 8);
        assert_eq!(build, ["--build", "/b", "--config", "Debug", "--parallel", "8"]);

        let install = CMake::install_command(Path::new("/b"), BuildType::Release, Path::new("/p"));
        assert_eq!(install, ["--install", "/b", "--config", "Release", "--prefix", "/p"]);
    }

    #[test]
    fn test_failing_program_is_build_error() {
        let tool = CMake::new("/nonexistent/cmake");
        let err = tool
            .build(Path::new("/tmp"), BuildType::Release, 1)
            .unwrap_err();
        assert!(matches!(err, Error::BuildError { ref step, .. } if step == "build"));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_keeps_stderr() {
        // `false` ignores its arguments and exits 1
        let tool = CMake::new("false");
        let err = tool
            .install(Path::new("/tmp"), BuildType::Release, Path::new("/tmp/p"))
            .unwrap_err();
        match err {
            Error::BuildError { step, status, .. } => {
                assert_eq!(step, "install");
                assert!(status.contains('1'));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
