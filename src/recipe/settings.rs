// src/recipe/settings.rs

//! Build settings supplied by the caller
//!
//! Settings describe the target of a build: operating system, architecture,
//! compiler and build type. The recipe reads them but never changes them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target operating system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Os {
    Linux,
    FreeBSD,
    Windows,
    Macos,
    Android,
    /// Any OS the recipe has no special handling for
    Other(String),
}

impl Os {
    /// Get the OS name as written in profiles
    pub fn as_str(&self) -> &str {
        match self {
            Os::Linux => "Linux",
            Os::FreeBSD => "FreeBSD",
            Os::Windows => "Windows",
            Os::Macos => "Macos",
            Os::Android => "Android",
            Os::Other(name) => name,
        }
    }

    /// Whether this OS links `m` and `pthread` as separate system libraries
    pub fn needs_posix_system_libs(&self) -> bool {
        matches!(self, Os::Linux | Os::FreeBSD)
    }
}

impl From<String> for Os {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Linux" => Os::Linux,
            "FreeBSD" => Os::FreeBSD,
            "Windows" => Os::Windows,
            "Macos" => Os::Macos,
            "Android" => Os::Android,
            _ => Os::Other(s),
        }
    }
}

impl From<Os> for String {
    fn from(os: Os) -> Self {
        os.as_str().to_string()
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compiler family
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompilerKind {
    VisualStudio,
    Gcc,
    Clang,
    AppleClang,
    /// A compiler the recipe does not recognize
    Unknown(String),
}

impl CompilerKind {
    /// Get the compiler name as written in profiles
    pub fn as_str(&self) -> &str {
        match self {
            CompilerKind::VisualStudio => "Visual Studio",
            CompilerKind::Gcc => "gcc",
            CompilerKind::Clang => "clang",
            CompilerKind::AppleClang => "apple-clang",
            CompilerKind::Unknown(name) => name,
        }
    }
}

impl From<String> for CompilerKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Visual Studio" => CompilerKind::VisualStudio,
            "gcc" => CompilerKind::Gcc,
            "clang" => CompilerKind::Clang,
            "apple-clang" => CompilerKind::AppleClang,
            _ => CompilerKind::Unknown(s),
        }
    }
}

impl From<CompilerKind> for String {
    fn from(kind: CompilerKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for CompilerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compiler settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerSettings {
    /// Compiler family
    pub name: CompilerKind,

    /// Compiler version (e.g., "9", "3.4")
    pub version: String,

    /// Requested C++ standard (e.g., "17", "gnu14")
    #[serde(default)]
    pub cppstd: Option<String>,
}

/// CMake build type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    /// Get the build type name as CMake spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target settings for a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Target operating system
    pub os: Os,

    /// Target CPU architecture (e.g., "x86_64", "armv8")
    pub arch: String,

    /// Compiler identity and version
    pub compiler: CompilerSettings,

    /// Build type
    #[serde(default)]
    pub build_type: BuildType,
}

impl Settings {
    /// Shorthand for building settings in code
    pub fn new(os: Os, compiler: CompilerKind, version: &str, build_type: BuildType) -> Self {
        Self {
            os,
            arch: "x86_64".to_string(),
            compiler: CompilerSettings {
                name: compiler,
                version: version.to_string(),
                cppstd: None,
            },
            build_type,
        }
    }

    /// Set the requested C++ standard
    pub fn with_cppstd(mut self, cppstd: &str) -> Self {
        self.compiler.cppstd = Some(cppstd.to_string());
        self
    }
}

/// A C++ language standard level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CppStd {
    /// Four-digit year of the standard (1998, 2011, 2014, ...)
    year: u16,
    /// Whether GNU extensions were requested
    gnu: bool,
}

impl CppStd {
    /// Parse a standard as written in profiles (`"14"`, `"gnu17"`, `"98"`)
    pub fn parse(s: &str) -> Result<Self> {
        let (gnu, level) = match s.strip_prefix("gnu") {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let year = match level {
            "98" => 1998,
            "11" => 2011,
            "14" => 2014,
            "17" => 2017,
            "20" => 2020,
            "23" => 2023,
            _ => {
                return Err(Error::ConfigurationError(format!(
                    "Unknown C++ standard '{}'",
                    s
                )));
            }
        };

        Ok(Self { year, gnu })
    }

    /// The standard as a two-digit CMake `CMAKE_CXX_STANDARD` value
    pub fn cmake_value(&self) -> u16 {
        self.year % 100
    }

    /// Whether GNU extensions were requested
    pub fn gnu_extensions(&self) -> bool {
        self.gnu
    }

    /// Whether this standard is at least C++`level` (two-digit form)
    pub fn at_least(&self, level: u16) -> bool {
        let wanted = if level >= 98 { 1900 + level } else { 2000 + level };
        self.year >= wanted
    }
}
